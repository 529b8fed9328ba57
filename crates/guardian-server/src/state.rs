use guardian_storage::{MemStorage, Storage};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<dyn Storage>,
}

impl AppState {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Fresh, empty in-memory store.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemStorage::new()))
    }
}
