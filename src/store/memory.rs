use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::watch;

use crate::models::order::OrderRecord;
use crate::store::OrderRepository;

/// One immutable view of the `pedidos` collection.
#[derive(Debug, Clone, Default)]
pub struct OrderSnapshot {
    pub revision: u64,
    pub orders: Vec<OrderRecord>,
    pub skipped: usize,
    pub received_at: Option<DateTime<Utc>>,
}

/// Holds the latest snapshot. Replacing it is atomic and wakes every
/// subscriber.
pub struct SnapshotStore {
    tx: watch::Sender<Arc<OrderSnapshot>>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        let (tx, _unused_rx) = watch::channel(Arc::new(OrderSnapshot::default()));
        Self { tx }
    }

    pub fn current(&self) -> Arc<OrderSnapshot> {
        Arc::clone(&self.tx.borrow())
    }

    pub fn replace(&self, orders: Vec<OrderRecord>, skipped: usize) -> Arc<OrderSnapshot> {
        let mut published = Arc::default();

        self.tx.send_modify(|current| {
            let next = Arc::new(OrderSnapshot {
                revision: current.revision + 1,
                orders,
                skipped,
                received_at: Some(Utc::now()),
            });
            published = Arc::clone(&next);
            *current = next;
        });

        published
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<OrderSnapshot>> {
        self.tx.subscribe()
    }
}

impl Default for SnapshotStore {
    fn default() -> Self {
        Self::new()
    }
}

impl OrderRepository for SnapshotStore {
    fn list_orders(&self) -> Vec<OrderRecord> {
        self.current().orders.clone()
    }

    fn get_order(&self, id: &str) -> Option<OrderRecord> {
        self.current()
            .orders
            .iter()
            .find(|order| order.id == id)
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::SnapshotStore;
    use crate::models::order::OrderRecord;
    use crate::store::OrderRepository;

    fn order(id: &str) -> OrderRecord {
        OrderRecord {
            id: id.to_string(),
            ..OrderRecord::default()
        }
    }

    #[test]
    fn starts_empty_at_revision_zero() {
        let store = SnapshotStore::new();

        assert_eq!(store.current().revision, 0);
        assert!(store.list_orders().is_empty());
        assert!(store.get_order("PED-1").is_none());
    }

    #[test]
    fn replace_swaps_the_whole_list_and_bumps_revision() {
        let store = SnapshotStore::new();
        store.replace(vec![order("PED-1"), order("PED-2")], 0);

        let snapshot = store.replace(vec![order("PED-3")], 1);

        assert_eq!(snapshot.revision, 2);
        assert_eq!(snapshot.skipped, 1);
        assert!(snapshot.received_at.is_some());
        assert_eq!(store.list_orders(), vec![order("PED-3")]);
        assert!(store.get_order("PED-1").is_none());
        assert_eq!(store.get_order("PED-3"), Some(order("PED-3")));
    }

    #[test]
    fn list_keeps_delivery_order() {
        let store = SnapshotStore::new();
        store.replace(vec![order("PED-9"), order("PED-2"), order("PED-5")], 0);

        let ids: Vec<String> = store.list_orders().into_iter().map(|o| o.id).collect();
        assert_eq!(ids, vec!["PED-9", "PED-2", "PED-5"]);
    }

    #[tokio::test]
    async fn subscribers_see_replacements() {
        let store = SnapshotStore::new();
        let mut rx = store.subscribe();

        store.replace(vec![order("PED-1")], 0);

        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().revision, 1);
    }
}
