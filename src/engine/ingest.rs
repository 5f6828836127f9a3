use std::path::Path;
use std::time::Instant;

use serde::Serialize;
use tracing::{info, warn};

use crate::engine::filter::{active_orders, count_by_status};
use crate::engine::view::build_views;
use crate::error::AppError;
use crate::models::document::{RawDocument, decode_snapshot};
use crate::state::AppState;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct IngestReport {
    pub revision: u64,
    pub accepted: usize,
    pub skipped: usize,
}

/// Decodes a pushed snapshot and publishes it in place of the previous one.
pub fn apply_snapshot(state: &AppState, documents: &[RawDocument]) -> IngestReport {
    let start = Instant::now();

    let decoded = decode_snapshot(documents);
    let counts = count_by_status(&build_views(
        &active_orders(&decoded.orders),
        &state.display,
    ));
    let accepted = decoded.orders.len();
    let skipped = decoded.skipped;

    let snapshot = state.store.replace(decoded.orders, skipped);

    state.metrics.snapshots_applied_total.inc();
    state.metrics.documents_skipped_total.inc_by(skipped as u64);
    state.metrics.record_counts(&counts);
    state
        .metrics
        .snapshot_apply_seconds
        .observe(start.elapsed().as_secs_f64());

    if skipped > 0 {
        warn!(
            revision = snapshot.revision,
            skipped, "dropped order documents without an id"
        );
    }

    info!(
        revision = snapshot.revision,
        accepted,
        pending = counts.pending,
        in_route = counts.in_route,
        delivered = counts.delivered,
        canceled = counts.canceled,
        "order snapshot applied"
    );

    IngestReport {
        revision: snapshot.revision,
        accepted,
        skipped,
    }
}

/// Reads a JSON array of `{ "id", "data" }` documents.
pub async fn read_snapshot_file(path: &Path) -> Result<Vec<RawDocument>, AppError> {
    let raw = tokio::fs::read_to_string(path).await.map_err(|err| {
        AppError::Internal(format!("failed to read {}: {err}", path.display()))
    })?;

    serde_json::from_str(&raw).map_err(|err| {
        AppError::BadRequest(format!("invalid snapshot file {}: {err}", path.display()))
    })
}
