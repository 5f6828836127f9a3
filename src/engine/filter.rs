use serde::Serialize;

use crate::engine::view::OrderView;
use crate::models::order::{OrderRecord, OrderStatus};

/// Status filter plus free-text search, as selected on the order list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderFilter {
    status: Option<OrderStatus>,
    query: String,
}

impl OrderFilter {
    pub fn new(status: Option<OrderStatus>, query: &str) -> Self {
        Self {
            status,
            query: query.trim().to_lowercase(),
        }
    }

    pub fn status(&self) -> Option<OrderStatus> {
        self.status
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn matches(&self, order: &OrderView) -> bool {
        if let Some(status) = self.status {
            if order.status != status {
                return false;
            }
        }

        if self.query.is_empty() {
            return true;
        }

        [&order.id, &order.client, &order.recipient, &order.route]
            .iter()
            .any(|field| field.to_lowercase().contains(&self.query))
    }

    /// Keeps matching orders in their input order.
    pub fn apply<'a>(&self, orders: &'a [OrderView]) -> Vec<&'a OrderView> {
        orders.iter().filter(|order| self.matches(order)).collect()
    }
}

pub fn filter_orders(
    orders: &[OrderView],
    status: Option<OrderStatus>,
    query: &str,
) -> Vec<OrderView> {
    OrderFilter::new(status, query)
        .apply(orders)
        .into_iter()
        .cloned()
        .collect()
}

#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct StatusCounts {
    pub total: usize,
    pub pending: usize,
    pub in_route: usize,
    pub delivered: usize,
    pub canceled: usize,
}

impl StatusCounts {
    pub fn get(&self, status: OrderStatus) -> usize {
        match status {
            OrderStatus::Pending => self.pending,
            OrderStatus::InRoute => self.in_route,
            OrderStatus::Delivered => self.delivered,
            OrderStatus::Canceled => self.canceled,
        }
    }
}

pub fn count_by_status(orders: &[OrderView]) -> StatusCounts {
    orders
        .iter()
        .fold(StatusCounts::default(), |mut counts, order| {
            counts.total += 1;
            match order.status {
                OrderStatus::Pending => counts.pending += 1,
                OrderStatus::InRoute => counts.in_route += 1,
                OrderStatus::Delivered => counts.delivered += 1,
                OrderStatus::Canceled => counts.canceled += 1,
            }
            counts
        })
}

/// Drops orders an administrator has already closed out of the daily cycle.
pub fn active_orders(records: &[OrderRecord]) -> Vec<OrderRecord> {
    records
        .iter()
        .filter(|record| !record.closed_by_admin)
        .cloned()
        .collect()
}
