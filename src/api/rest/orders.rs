use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::extract::{Path, Query, State};
use axum::routing::{get, put};
use serde::{Deserialize, Serialize};

use crate::engine::filter::{OrderFilter, StatusCounts, active_orders, count_by_status};
use crate::engine::format::DisplayFormat;
use crate::engine::ingest::{IngestReport, apply_snapshot};
use crate::engine::view::{OrderDetails, OrderView, build_views};
use crate::error::AppError;
use crate::models::document::RawDocument;
use crate::models::order::{OrderRecord, OrderStatus};
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/orders", get(list_orders))
        .route("/orders/counts", get(order_counts))
        .route("/orders/:id", get(get_order))
        .route("/snapshot", put(replace_snapshot))
}

#[derive(Debug, Default, Deserialize)]
pub struct ListOrdersQuery {
    pub status: Option<String>,
    pub q: Option<String>,
    #[serde(default)]
    pub include_closed: bool,
}

/// A filtered order list plus tallies over the unfiltered list.
#[derive(Debug, Clone, Serialize)]
pub struct OrderListing {
    pub revision: u64,
    pub counts: StatusCounts,
    pub orders: Vec<OrderView>,
}

impl OrderListing {
    pub fn build(
        revision: u64,
        records: &[OrderRecord],
        filter: &OrderFilter,
        include_closed: bool,
        display: &DisplayFormat,
    ) -> Self {
        let views = if include_closed {
            build_views(records, display)
        } else {
            build_views(&active_orders(records), display)
        };

        Self {
            revision,
            counts: count_by_status(&views),
            orders: filter.apply(&views).into_iter().cloned().collect(),
        }
    }
}

pub fn parse_status(raw: Option<&str>) -> Result<Option<OrderStatus>, AppError> {
    let Some(raw) = raw.map(str::trim).filter(|raw| !raw.is_empty()) else {
        return Ok(None);
    };

    let normalized: String = raw
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_lowercase();

    match normalized.as_str() {
        "all" => Ok(None),
        "pending" => Ok(Some(OrderStatus::Pending)),
        "inroute" => Ok(Some(OrderStatus::InRoute)),
        "delivered" => Ok(Some(OrderStatus::Delivered)),
        "canceled" | "cancelled" => Ok(Some(OrderStatus::Canceled)),
        _ => Err(AppError::BadRequest(format!(
            "unknown status: {raw}, expected Pending/InRoute/Delivered/Canceled"
        ))),
    }
}

async fn list_orders(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListOrdersQuery>,
) -> Result<Json<OrderListing>, AppError> {
    let status = parse_status(params.status.as_deref())?;
    let filter = OrderFilter::new(status, params.q.as_deref().unwrap_or_default());

    let snapshot = state.store.current();
    let listing = OrderListing::build(
        snapshot.revision,
        &snapshot.orders,
        &filter,
        params.include_closed,
        &state.display,
    );

    Ok(Json(listing))
}

async fn order_counts(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListOrdersQuery>,
) -> Json<StatusCounts> {
    let records = state.repository.list_orders();
    let records = if params.include_closed {
        records
    } else {
        active_orders(&records)
    };

    Json(count_by_status(&build_views(&records, &state.display)))
}

async fn get_order(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<OrderDetails>, AppError> {
    let record = state
        .repository
        .get_order(&id)
        .ok_or_else(|| AppError::NotFound(format!("order {} not found", id)))?;

    Ok(Json(OrderDetails::from_record(&record, &state.display)))
}

async fn replace_snapshot(
    State(state): State<Arc<AppState>>,
    Json(documents): Json<Vec<RawDocument>>,
) -> Json<IngestReport> {
    Json(apply_snapshot(&state, &documents))
}

#[cfg(test)]
mod tests {
    use super::parse_status;
    use crate::models::order::OrderStatus;

    #[test]
    fn status_parameter_accepts_common_spellings() {
        assert_eq!(parse_status(None).unwrap(), None);
        assert_eq!(parse_status(Some("  ")).unwrap(), None);
        assert_eq!(parse_status(Some("all")).unwrap(), None);
        assert_eq!(
            parse_status(Some("InRoute")).unwrap(),
            Some(OrderStatus::InRoute)
        );
        assert_eq!(
            parse_status(Some("in_route")).unwrap(),
            Some(OrderStatus::InRoute)
        );
        assert_eq!(
            parse_status(Some("Cancelled")).unwrap(),
            Some(OrderStatus::Canceled)
        );
    }

    #[test]
    fn unknown_status_is_rejected() {
        assert!(parse_status(Some("lost")).is_err());
    }
}
