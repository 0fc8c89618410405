use crate::domain::status::models::container::{ContainerName, ContainerRecord};
use crate::domain::status::port::ContainerInspector;
use log::{debug, trace, warn};
use serde::Deserialize;
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::process::Command;

#[derive(Debug, Error)]
pub(crate) enum InspectError {
    #[error("failed to run `{binary}`: {source}")]
    Spawn {
        binary: String,
        #[source]
        source: std::io::Error,
    },
    #[error("inspection did not finish within {0:?}")]
    Timeout(Duration),
    #[error("inspection exited with {status}: {stderr}")]
    Failed { status: String, stderr: String },
    #[error("malformed inspection output: {0}")]
    Json(#[from] serde_json::Error),
    #[error("inspection returned no containers")]
    Empty,
}

#[derive(Deserialize, Debug, Default)]
struct InspectState {
    #[serde(rename = "Status", default)]
    status: Option<String>,
}

// Subset of `podman inspect` output we care about
#[derive(Deserialize, Debug)]
struct InspectEntry {
    #[serde(rename = "ImageDigest", default)]
    image_digest: Option<String>,
    #[serde(rename = "ImageName", default)]
    image_name: Option<String>,
    #[serde(rename = "Created", default)]
    created: Option<String>,
    #[serde(rename = "State", default)]
    state: Option<InspectState>,
}

impl From<InspectEntry> for ContainerRecord {
    fn from(entry: InspectEntry) -> Self {
        ContainerRecord {
            digest: entry.image_digest.unwrap_or_default(),
            image: entry.image_name.unwrap_or_default(),
            created: entry.created.unwrap_or_default(),
            status: entry.state.unwrap_or_default().status.unwrap_or_default(),
        }
    }
}

pub(crate) fn parse_inspect_output(stdout: &str) -> Result<ContainerRecord, InspectError> {
    let entries: Vec<InspectEntry> = serde_json::from_str(stdout)?;
    entries
        .into_iter()
        .next()
        .map(ContainerRecord::from)
        .ok_or(InspectError::Empty)
}

/// Inspects containers by running `<binary> inspect <name>`, e.g. `podman inspect buckman-proxy`.
#[derive(Clone, Debug)]
pub struct RuntimeCli {
    binary: Arc<str>,
    timeout: Duration,
}

impl RuntimeCli {
    pub fn new(binary: impl Into<Arc<str>>, timeout: Duration) -> Self {
        Self {
            binary: binary.into(),
            timeout,
        }
    }

    async fn try_inspect(&self, name: &ContainerName) -> Result<ContainerRecord, InspectError> {
        let child = Command::new(&*self.binary)
            .arg("inspect")
            .arg(name.as_str())
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output();

        let output = tokio::time::timeout(self.timeout, child)
            .await
            .map_err(|_| InspectError::Timeout(self.timeout))?
            .map_err(|source| InspectError::Spawn {
                binary: self.binary.to_string(),
                source,
            })?;

        if !output.status.success() {
            return Err(InspectError::Failed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        let stdout = String::from_utf8_lossy(&output.stdout);
        trace!("inspect output of {name}: {stdout}");
        parse_inspect_output(&stdout)
    }
}

impl ContainerInspector for RuntimeCli {
    async fn inspect(&self, name: &ContainerName) -> Option<ContainerRecord> {
        match self.try_inspect(name).await {
            Ok(record) => {
                debug!("container {name} is {}", record.status);
                Some(record)
            }
            Err(e) => {
                warn!("could not inspect container {name}: {e}");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PODMAN_OUTPUT: &str = r#"[
        {
            "Id": "4f6b0c1b9a1e",
            "Created": "2024-01-01T00:00:00.123456789Z",
            "ImageDigest": "sha256:0123456789abcdef",
            "ImageName": "ghcr.io/example/buckman-proxy:latest",
            "State": {"Status": "running", "Running": true, "Pid": 4242}
        },
        {
            "ImageName": "ignored"
        }
    ]"#;

    #[test]
    fn test_parse_first_entry() {
        let record = parse_inspect_output(PODMAN_OUTPUT).unwrap();
        assert_eq!(record.digest, "sha256:0123456789abcdef");
        assert_eq!(record.image, "ghcr.io/example/buckman-proxy:latest");
        assert_eq!(record.created, "2024-01-01T00:00:00.123456789Z");
        assert_eq!(record.status, "running");
    }

    #[test]
    fn test_missing_fields_default_to_empty() {
        let record = parse_inspect_output(r#"[{"ImageName": "proxy", "State": {}}]"#).unwrap();
        assert_eq!(record.image, "proxy");
        assert_eq!(record.digest, "");
        assert_eq!(record.created, "");
        assert_eq!(record.status, "");

        let record = parse_inspect_output(r#"[{"ImageDigest": null}]"#).unwrap();
        assert_eq!(record, ContainerRecord::default());
    }

    #[test]
    fn test_empty_output_is_error() {
        assert!(matches!(
            parse_inspect_output("[]"),
            Err(InspectError::Empty)
        ));
    }

    #[test]
    fn test_malformed_output_is_error() {
        assert!(matches!(
            parse_inspect_output("Error: no such container"),
            Err(InspectError::Json(_))
        ));
        assert!(matches!(
            parse_inspect_output(r#"{"ImageName": "not-an-array"}"#),
            Err(InspectError::Json(_))
        ));
        assert!(matches!(
            parse_inspect_output(""),
            Err(InspectError::Json(_))
        ));
    }

    #[tokio::test]
    async fn test_missing_binary_is_absent() {
        let inspector = RuntimeCli::new("/nonexistent/podman", Duration::from_secs(1));
        assert!(
            inspector
                .inspect(&ContainerName::new("buckman-proxy"))
                .await
                .is_none()
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_failing_command_is_absent() {
        // `false inspect <name>` exits with status 1
        let inspector = RuntimeCli::new("false", Duration::from_secs(5));
        let result = inspector
            .try_inspect(&ContainerName::new("buckman-proxy"))
            .await;
        assert!(matches!(result, Err(InspectError::Failed { .. })));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_timeout_kills_runtime_command() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let marker = dir.path().join("finished");
        let script = dir.path().join("podman");
        std::fs::write(
            &script,
            format!(
                "#!/bin/sh\nsleep 2\ntouch '{}'\necho '[]'\n",
                marker.display()
            ),
        )
        .unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let inspector = RuntimeCli::new(
            script.to_str().unwrap(),
            Duration::from_millis(200),
        );
        let name = ContainerName::new("buckman-proxy");
        let result = inspector.try_inspect(&name).await;
        assert!(matches!(result, Err(InspectError::Timeout(_))));
        assert!(inspector.inspect(&name).await.is_none());

        // the script would have created the marker had it not been killed
        tokio::time::sleep(Duration::from_secs(3)).await;
        assert!(!marker.exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_non_json_output_is_absent() {
        // `echo inspect <name>` succeeds but prints plain text
        let inspector = RuntimeCli::new("echo", Duration::from_secs(5));
        let result = inspector
            .try_inspect(&ContainerName::new("buckman-proxy"))
            .await;
        assert!(matches!(result, Err(InspectError::Json(_))));
    }
}
