use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::engine::format::{DisplayFormat, MISSING, format_amount, group_thousands};
use crate::engine::status::{
    current_driver_name, current_driver_phone, has_delivery_driver, is_picked_up,
    is_pickup_completed, resolve_status,
};
use crate::models::order::{OrderRecord, OrderStatus};

const UNKNOWN_CLIENT: &str = "Unknown client";
const UNKNOWN_RECIPIENT: &str = "Unknown recipient";
const NO_DRIVER: &str = "No driver assigned";
const CANCELED_FALLBACK: &str = "Canceled";

/// One row of the order list, recomputed from the record on every read.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct OrderView {
    pub id: String,
    pub status: OrderStatus,
    pub status_label: &'static str,
    pub client: String,
    pub recipient: String,
    pub route: String,
    pub delivery_info: String,
    pub driver_info: Option<String>,
    pub is_picked_up: bool,
    pub is_pickup_completed: bool,
    pub has_delivery_driver: bool,
    pub created_at: Option<DateTime<Utc>>,
}

impl OrderView {
    pub fn from_record(record: &OrderRecord, format: &DisplayFormat) -> Self {
        let status = resolve_status(record);

        Self {
            id: record.id.clone(),
            status,
            status_label: status.display_name(),
            client: record
                .client
                .name
                .clone()
                .unwrap_or_else(|| UNKNOWN_CLIENT.to_string()),
            recipient: record
                .recipient
                .name
                .clone()
                .unwrap_or_else(|| UNKNOWN_RECIPIENT.to_string()),
            route: route_label(record),
            delivery_info: delivery_info_label(record, status, format),
            driver_info: driver_info_label(record, status),
            is_picked_up: is_picked_up(record),
            is_pickup_completed: is_pickup_completed(record),
            has_delivery_driver: has_delivery_driver(record),
            created_at: record.timestamps.created,
        }
    }
}

pub fn build_views(records: &[OrderRecord], format: &DisplayFormat) -> Vec<OrderView> {
    records
        .iter()
        .map(|record| OrderView::from_record(record, format))
        .collect()
}

pub fn route_label(record: &OrderRecord) -> String {
    let pickup = record.client.district.as_deref().unwrap_or(MISSING);
    let delivery = record.recipient.district.as_deref().unwrap_or(MISSING);
    format!("{pickup} → {delivery}")
}

pub fn driver_info_label(record: &OrderRecord, status: OrderStatus) -> Option<String> {
    match current_driver_name(record) {
        Some(name) => Some(format!("Driver: {name}")),
        None if status == OrderStatus::Pending => Some(NO_DRIVER.to_string()),
        None => None,
    }
}

pub fn delivery_info_label(
    record: &OrderRecord,
    status: OrderStatus,
    format: &DisplayFormat,
) -> String {
    match status {
        OrderStatus::Delivered => {
            format!("Delivered: {}", format.short(record.timestamps.delivered_at))
        }
        OrderStatus::Canceled => record
            .cancellation_reason
            .clone()
            .unwrap_or_else(|| CANCELED_FALLBACK.to_string()),
        OrderStatus::Pending | OrderStatus::InRoute => format!(
            "Delivery: {}",
            format.short(record.timestamps.scheduled_delivery)
        ),
    }
}

/// Everything the detail screen shows for a single order.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct OrderDetails {
    pub order: OrderView,
    pub dimensions: String,
    pub volume: String,
    pub weight: String,
    pub photos: Vec<String>,
    pub created_at: String,
    pub scheduled_delivery: String,
    pub delivered_at: Option<String>,
    pub service_amount: String,
    pub payment_status: &'static str,
    pub is_paid: bool,
    pub customer_phone: Option<String>,
    pub recipient_phone: Option<String>,
    pub driver_phone: Option<String>,
}

impl OrderDetails {
    pub fn from_record(record: &OrderRecord, format: &DisplayFormat) -> Self {
        let order = OrderView::from_record(record, format);
        let package = &record.package;

        let (dimensions, volume) = match package.dimensions {
            Some(dims) => {
                let (length, width, height) = (
                    dims.length_cm as i64,
                    dims.width_cm as i64,
                    dims.height_cm as i64,
                );
                let volume = length
                    .checked_mul(width)
                    .and_then(|area| area.checked_mul(height))
                    .map(|cubic| format!("{} cm³", group_thousands(cubic)))
                    .unwrap_or_else(|| MISSING.to_string());
                (format!("{length} x {width} x {height} cm"), volume)
            }
            None => (MISSING.to_string(), MISSING.to_string()),
        };

        let weight = package
            .weight_kg
            .map(weight_label)
            .unwrap_or_else(|| MISSING.to_string());

        let payment = &record.payment;
        let service_amount = if payment.should_charge {
            format_amount(payment.total_amount)
        } else {
            format_amount(Decimal::ZERO)
        };

        Self {
            dimensions,
            volume,
            weight,
            photos: package.photo_urls.clone(),
            created_at: format.long(record.timestamps.created),
            scheduled_delivery: format.long(record.timestamps.scheduled_delivery),
            delivered_at: record
                .timestamps
                .delivered_at
                .map(|instant| format.long(Some(instant))),
            service_amount,
            payment_status: if payment.is_paid { "Paid" } else { "Pending" },
            is_paid: payment.is_paid,
            customer_phone: record.client.phone.clone(),
            recipient_phone: record.recipient.phone.clone(),
            driver_phone: current_driver_phone(record).map(str::to_string),
            order,
        }
    }
}

/// Whole weights keep one decimal place: `3.0 kg`, `2.5 kg`.
fn weight_label(kg: f64) -> String {
    if kg.fract() == 0.0 {
        format!("{kg:.1} kg")
    } else {
        format!("{kg} kg")
    }
}
