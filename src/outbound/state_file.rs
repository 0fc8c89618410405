use crate::domain::status::models::version::PollerState;
use crate::domain::status::port::StateReader;
use log::{debug, warn};
use std::io::ErrorKind;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum StateError {
    #[error("state file does not exist")]
    NotFound,
    #[error("failed to read state file: {0}")]
    Io(#[from] std::io::Error),
    #[error("state file is not valid json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("state file does not contain a json object")]
    NotAnObject,
}

pub(crate) fn parse_state(content: &[u8]) -> Result<PollerState, StateError> {
    match serde_json::from_slice::<serde_json::Value>(content)? {
        serde_json::Value::Object(state) => Ok(state),
        _ => Err(StateError::NotAnObject),
    }
}

/// Reads the json document written by the image poller from disk.
#[derive(Clone, Debug, Default)]
pub struct StateFile;

impl StateFile {
    async fn try_read(&self, path: &Path) -> Result<PollerState, StateError> {
        let content = tokio::fs::read(path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => StateError::NotFound,
            _ => StateError::Io(e),
        })?;
        parse_state(&content)
    }
}

impl StateReader for StateFile {
    async fn read_state(&self, path: &Path) -> PollerState {
        match self.try_read(path).await {
            Ok(state) => state,
            Err(StateError::NotFound) => {
                debug!("no poller state at {}", path.display());
                PollerState::new()
            }
            Err(e) => {
                warn!("ignoring poller state at {}: {e}", path.display());
                PollerState::new()
            }
        }
    }
}
