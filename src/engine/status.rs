use crate::models::order::{AssignmentState, OrderRecord, OrderStatus};

/// Resolves the user-facing status of an order. First matching rule wins.
///
/// A completed pickup with no delivery driver yet drops back to `Pending`:
/// the order needs a delivery assignment before it can move again.
pub fn resolve_status(record: &OrderRecord) -> OrderStatus {
    if record.timestamps.delivered_at.is_some() {
        return OrderStatus::Delivered;
    }

    if record.timestamps.canceled_at.is_some() {
        return OrderStatus::Canceled;
    }

    if record.delivery_state() == AssignmentState::EnRoute {
        return OrderStatus::InRoute;
    }

    if is_pickup_completed(record) && !has_delivery_driver(record) {
        return OrderStatus::Pending;
    }

    if has_delivery_driver(record) {
        return OrderStatus::InRoute;
    }

    match record.pickup_state() {
        AssignmentState::EnRoute | AssignmentState::Assigned => OrderStatus::InRoute,
        _ => OrderStatus::Pending,
    }
}

pub fn is_picked_up(record: &OrderRecord) -> bool {
    record.timestamps.picked_up_at.is_some()
}

pub fn is_pickup_completed(record: &OrderRecord) -> bool {
    record.pickup_state() == AssignmentState::Completed
}

pub fn has_delivery_driver(record: &OrderRecord) -> bool {
    record.delivery_driver_name().is_some()
}

/// Driver for the current phase: the delivery driver when there is one,
/// otherwise whoever holds the pickup leg.
pub fn current_driver_name(record: &OrderRecord) -> Option<&str> {
    record
        .delivery_driver_name()
        .or_else(|| record.pickup_driver_name())
}

pub fn current_driver_phone(record: &OrderRecord) -> Option<&str> {
    let delivery = record
        .delivery_assignment
        .as_ref()
        .and_then(|leg| leg.driver_phone.as_deref());
    let pickup = record
        .pickup_assignment
        .as_ref()
        .and_then(|leg| leg.driver_phone.as_deref());

    delivery.or(pickup)
}
