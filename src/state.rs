use std::sync::Arc;

use crate::engine::format::DisplayFormat;
use crate::observability::metrics::Metrics;
use crate::store::OrderRepository;
use crate::store::memory::SnapshotStore;

pub struct AppState {
    pub repository: Arc<dyn OrderRepository>,
    pub store: Arc<SnapshotStore>,
    pub display: DisplayFormat,
    pub metrics: Metrics,
}

impl AppState {
    pub fn new(display: DisplayFormat) -> Self {
        let store = Arc::new(SnapshotStore::new());

        Self {
            repository: store.clone(),
            store,
            display,
            metrics: Metrics::new(),
        }
    }
}
