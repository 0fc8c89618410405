use crate::domain::status::models::container::{ContainerName, ContainerRecord};
use crate::domain::status::models::version::PollerState;
use crate::domain::status::port::{ContainerInspector, StateReader};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Inspector answering from a fixed table. Containers not in the table are absent.
#[derive(Clone, Default)]
pub struct MemoryInspector {
    records: Arc<HashMap<ContainerName, ContainerRecord>>,
    calls: Arc<AtomicUsize>,
}

impl MemoryInspector {
    pub fn with(mut self, name: &str, record: ContainerRecord) -> Self {
        Arc::make_mut(&mut self.records).insert(ContainerName::new(name), record);
        self
    }

    /// Number of lookups served so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ContainerInspector for MemoryInspector {
    async fn inspect(&self, name: &ContainerName) -> Option<ContainerRecord> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.records.get(name).cloned()
    }
}

/// State reader returning the same snapshot regardless of the path.
#[derive(Clone, Default)]
pub struct MemoryStateReader {
    state: Arc<PollerState>,
}

impl MemoryStateReader {
    pub fn new(state: PollerState) -> Self {
        Self {
            state: Arc::new(state),
        }
    }
}

impl StateReader for MemoryStateReader {
    async fn read_state(&self, _path: &Path) -> PollerState {
        self.state.as_ref().clone()
    }
}
