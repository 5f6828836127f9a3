//! Read access to order documents.
//!
//! Handlers and the live feed receive records through [`OrderRepository`];
//! nothing in the engine fetches data on its own.

pub mod memory;

use crate::models::order::OrderRecord;

pub trait OrderRepository: Send + Sync {
    /// Every known order, in the order the store delivered them
    /// (newest first).
    fn list_orders(&self) -> Vec<OrderRecord>;

    fn get_order(&self, id: &str) -> Option<OrderRecord>;
}
