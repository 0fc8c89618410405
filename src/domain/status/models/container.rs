use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt::{Display, Formatter};
use thiserror::Error;

const RUNNING: &str = "running";

/// Name of a container as known to the container runtime, e.g. "buckman-proxy"
#[derive(Deserialize, Serialize, Debug, Clone, Hash, Eq, PartialEq)]
pub struct ContainerName(String);

impl ContainerName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ContainerName {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Point in time snapshot of a single container as reported by the runtime.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct ContainerRecord {
    pub digest: String,
    pub image: String,
    pub created: String,
    pub status: String,
}

impl ContainerRecord {
    pub fn is_running(&self) -> bool {
        self.status == RUNNING
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ManagedContainersError {
    #[error("container `{0}` is listed more than once")]
    Duplicate(ContainerName),
    #[error("container names must not be empty")]
    EmptyName,
}

/// Ordered set of containers this service reports on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagedContainers(Vec<ContainerName>);

impl ManagedContainers {
    pub fn new(names: Vec<ContainerName>) -> Result<Self, ManagedContainersError> {
        let mut seen = HashSet::new();
        for name in &names {
            if name.as_str().trim().is_empty() {
                return Err(ManagedContainersError::EmptyName);
            }
            if !seen.insert(name) {
                return Err(ManagedContainersError::Duplicate(name.clone()));
            }
        }
        Ok(Self(names))
    }

    pub fn iter(&self) -> impl Iterator<Item = &ContainerName> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Display for ManagedContainers {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.0.iter().map(ContainerName::as_str).collect();
        write!(f, "{}", names.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_running_requires_exact_status() {
        let mut record = ContainerRecord {
            status: "running".to_string(),
            ..Default::default()
        };
        assert!(record.is_running());
        record.status = "Running".to_string();
        assert!(!record.is_running());
        record.status = "exited".to_string();
        assert!(!record.is_running());
    }

    #[test]
    fn test_managed_containers_rejects_duplicates() {
        let names = vec![
            ContainerName::new("buckman-proxy"),
            ContainerName::new("poller"),
            ContainerName::new("buckman-proxy"),
        ];
        assert_eq!(
            ManagedContainers::new(names),
            Err(ManagedContainersError::Duplicate(ContainerName::new(
                "buckman-proxy"
            )))
        );
    }

    #[test]
    fn test_managed_containers_rejects_blank_names() {
        let names = vec![ContainerName::new("  ")];
        assert_eq!(
            ManagedContainers::new(names),
            Err(ManagedContainersError::EmptyName)
        );
    }

    #[test]
    fn test_container_name_from_plain_string() {
        let name: ContainerName = serde_json::from_str(r#""buckman-proxy""#).unwrap();
        assert_eq!(name.as_str(), "buckman-proxy");
        assert_eq!(
            serde_json::to_string(&name).unwrap(),
            r#""buckman-proxy""#
        );
    }

    #[test]
    fn test_managed_containers_keeps_order() {
        let containers = ManagedContainers::new(vec![
            ContainerName::new("b"),
            ContainerName::new("a"),
        ])
        .unwrap();
        let order: Vec<&str> = containers.iter().map(|c| c.as_str()).collect();
        assert_eq!(order, vec!["b", "a"]);
        assert_eq!(containers.to_string(), "b, a");
    }
}
