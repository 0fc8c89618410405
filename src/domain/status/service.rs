use crate::domain::status::models::container::ManagedContainers;
use crate::domain::status::models::version::{ContainerVersions, VersionResponse};
use crate::domain::status::port::{ContainerInspector, StateReader, StatusService};
use chrono::Utc;
use futures_util::future::join_all;
use log::{debug, warn};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Clone)]
pub struct Service<CI: ContainerInspector, SR: StateReader> {
    inspector: CI,
    state_reader: SR,
    containers: Arc<ManagedContainers>,
    state_file: Arc<PathBuf>,
}

impl<CI: ContainerInspector, SR: StateReader> Service<CI, SR> {
    pub fn new(
        inspector: CI,
        state_reader: SR,
        containers: ManagedContainers,
        state_file: impl Into<PathBuf>,
    ) -> Self {
        Self {
            inspector,
            state_reader,
            containers: Arc::new(containers),
            state_file: Arc::new(state_file.into()),
        }
    }
}

impl<CI: ContainerInspector, SR: StateReader> StatusService for Service<CI, SR> {
    async fn version(&self) -> VersionResponse {
        let now = Utc::now();
        let lookups: Vec<_> = self
            .containers
            .iter()
            .map(|name| self.inspector.inspect(name))
            .collect();
        let records = join_all(lookups).await;
        let containers: ContainerVersions =
            self.containers.iter().cloned().zip(records).collect();
        if containers.is_empty() {
            warn!("none of the managed containers could be inspected");
        } else {
            debug!(
                "{} of {} containers available",
                containers.len(),
                self.containers.len()
            );
        }
        let poller_state = self.state_reader.read_state(&self.state_file).await;
        VersionResponse::new(now, containers, poller_state)
    }

    async fn is_healthy(&self) -> bool {
        for name in self.containers.iter() {
            match self.inspector.inspect(name).await {
                Some(record) if record.is_running() => return true,
                Some(record) => debug!("container {name} is {}", record.status),
                None => debug!("container {name} not available"),
            }
        }
        false
    }
}
