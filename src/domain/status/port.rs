use crate::domain::status::models::container::{ContainerName, ContainerRecord};
use crate::domain::status::models::version::{PollerState, VersionResponse};
use std::path::Path;

/// Looks up live metadata of a container. Every failure is reported as `None`.
pub trait ContainerInspector: Send + Sync + 'static + Clone {
    fn inspect(
        &self,
        name: &ContainerName,
    ) -> impl Future<Output = Option<ContainerRecord>> + Send;
}

/// Reads the poller state snapshot. Missing or corrupt sources yield an empty mapping.
pub trait StateReader: Send + Sync + 'static + Clone {
    fn read_state(&self, path: &Path) -> impl Future<Output = PollerState> + Send;
}

// The status service answers the questions asked by the http layer
pub trait StatusService: Send + Sync + 'static + Clone {
    fn version(&self) -> impl Future<Output = VersionResponse> + Send;
    fn is_healthy(&self) -> impl Future<Output = bool> + Send;
}
