use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounter, IntGaugeVec, Opts, Registry, TextEncoder,
};

use crate::engine::filter::StatusCounts;
use crate::models::order::OrderStatus;

#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    pub snapshots_applied_total: IntCounter,
    pub documents_skipped_total: IntCounter,
    pub orders_by_status: IntGaugeVec,
    pub snapshot_apply_seconds: Histogram,
}

impl Metrics {
    pub fn new() -> Self {
        let registry = Registry::new();

        let snapshots_applied_total = IntCounter::new(
            "snapshots_applied_total",
            "Total order snapshots applied",
        )
        .expect("valid snapshots_applied_total metric");

        let documents_skipped_total = IntCounter::new(
            "documents_skipped_total",
            "Order documents dropped because no id could be read",
        )
        .expect("valid documents_skipped_total metric");

        let orders_by_status = IntGaugeVec::new(
            Opts::new("orders_by_status", "Active orders per resolved status"),
            &["status"],
        )
        .expect("valid orders_by_status metric");

        let snapshot_apply_seconds = Histogram::with_opts(HistogramOpts::new(
            "snapshot_apply_seconds",
            "Time to decode and publish an order snapshot in seconds",
        ))
        .expect("valid snapshot_apply_seconds metric");

        registry
            .register(Box::new(snapshots_applied_total.clone()))
            .expect("register snapshots_applied_total");
        registry
            .register(Box::new(documents_skipped_total.clone()))
            .expect("register documents_skipped_total");
        registry
            .register(Box::new(orders_by_status.clone()))
            .expect("register orders_by_status");
        registry
            .register(Box::new(snapshot_apply_seconds.clone()))
            .expect("register snapshot_apply_seconds");

        Self {
            registry,
            snapshots_applied_total,
            documents_skipped_total,
            orders_by_status,
            snapshot_apply_seconds,
        }
    }

    pub fn record_counts(&self, counts: &StatusCounts) {
        for status in OrderStatus::ALL {
            self.orders_by_status
                .with_label_values(&[status.key()])
                .set(counts.get(status) as i64);
        }
    }

    pub fn encode(&self) -> Result<String, String> {
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();

        TextEncoder::new()
            .encode(&metric_families, &mut buffer)
            .map_err(|err| format!("failed to encode metrics: {err}"))?;

        String::from_utf8(buffer).map_err(|err| format!("metrics are not valid utf8: {err}"))
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
