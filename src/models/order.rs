use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum OrderStatus {
    Pending,
    InRoute,
    Delivered,
    Canceled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 4] = [
        OrderStatus::Pending,
        OrderStatus::InRoute,
        OrderStatus::Delivered,
        OrderStatus::Canceled,
    ];

    pub fn display_name(self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::InRoute => "In route",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Canceled => "Canceled",
        }
    }

    /// Stable lowercase key used for metric labels.
    pub fn key(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::InRoute => "in_route",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Canceled => "canceled",
        }
    }
}

/// Per-leg sub-status tracked independently for pickup and delivery.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentState {
    #[default]
    None,
    Pending,
    Assigned,
    EnRoute,
    Completed,
}

impl AssignmentState {
    /// Maps the stored `estado` string. Unknown values read as `None`.
    pub fn from_wire(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "pendiente" | "pending" => AssignmentState::Pending,
            "asignado" | "asignada" | "assigned" => AssignmentState::Assigned,
            "en_camino" | "en_route" => AssignmentState::EnRoute,
            "completada" | "completado" | "completed" => AssignmentState::Completed,
            _ => AssignmentState::None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LegAssignment {
    pub driver_name: Option<String>,
    pub driver_phone: Option<String>,
    pub route_name: Option<String>,
    pub state: AssignmentState,
    pub assigned_at: Option<DateTime<Utc>>,
    pub pending_reason: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct OrderTimestamps {
    pub created: Option<DateTime<Utc>>,
    pub scheduled_delivery: Option<DateTime<Utc>>,
    pub picked_up_at: Option<DateTime<Utc>>,
    pub delivered_at: Option<DateTime<Utc>>,
    pub canceled_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Payment {
    pub should_charge: bool,
    pub base_amount: Decimal,
    pub commission: Decimal,
    pub total_amount: Decimal,
    pub is_paid: bool,
}

/// Sender ("proveedor") or recipient ("destinatario") of an order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Party {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub district: Option<String>,
    pub address_link: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Dimensions {
    pub length_cm: f64,
    pub width_cm: f64,
    pub height_cm: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PackageInfo {
    pub dimensions: Option<Dimensions>,
    pub weight_kg: Option<f64>,
    pub photo_urls: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct OrderRecord {
    pub id: String,
    pub client: Party,
    pub recipient: Party,
    pub pickup_assignment: Option<LegAssignment>,
    pub delivery_assignment: Option<LegAssignment>,
    pub timestamps: OrderTimestamps,
    pub payment: Payment,
    pub package: PackageInfo,
    pub cancellation_reason: Option<String>,
    pub closed_by_admin: bool,
}

impl OrderRecord {
    pub fn pickup_state(&self) -> AssignmentState {
        self.pickup_assignment
            .as_ref()
            .map(|leg| leg.state)
            .unwrap_or_default()
    }

    pub fn delivery_state(&self) -> AssignmentState {
        self.delivery_assignment
            .as_ref()
            .map(|leg| leg.state)
            .unwrap_or_default()
    }

    pub fn pickup_driver_name(&self) -> Option<&str> {
        self.pickup_assignment
            .as_ref()
            .and_then(|leg| leg.driver_name.as_deref())
    }

    pub fn delivery_driver_name(&self) -> Option<&str> {
        self.delivery_assignment
            .as_ref()
            .and_then(|leg| leg.driver_name.as_deref())
    }
}
