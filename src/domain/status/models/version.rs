use crate::domain::status::models::container::{ContainerName, ContainerRecord};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use serde::ser::SerializeMap;

/// Progress snapshot written by the external image poller. Forwarded verbatim.
pub type PollerState = serde_json::Map<String, serde_json::Value>;

/// Records of the containers that could be inspected, in configuration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContainerVersions(Vec<(ContainerName, ContainerRecord)>);

impl ContainerVersions {
    pub fn insert(&mut self, name: ContainerName, record: ContainerRecord) {
        self.0.push((name, record));
    }

    #[cfg(test)]
    pub fn get(&self, name: &ContainerName) -> Option<&ContainerRecord> {
        self.0.iter().find(|(n, _)| n == name).map(|(_, r)| r)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(ContainerName, Option<ContainerRecord>)> for ContainerVersions {
    fn from_iter<I: IntoIterator<Item = (ContainerName, Option<ContainerRecord>)>>(iter: I) -> Self {
        let mut versions = Self::default();
        for (name, record) in iter {
            if let Some(record) = record {
                versions.insert(name, record);
            }
        }
        versions
    }
}

impl Serialize for ContainerVersions {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, record) in &self.0 {
            map.serialize_entry(name.as_str(), record)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct VersionResponse {
    pub timestamp: String,
    pub containers: ContainerVersions,
    pub poller_state: PollerState,
}

impl VersionResponse {
    pub fn new(
        now: DateTime<Utc>,
        containers: ContainerVersions,
        poller_state: PollerState,
    ) -> Self {
        Self {
            timestamp: utc_timestamp(now),
            containers,
            poller_state,
        }
    }
}

/// ISO-8601 in UTC with microseconds and a `Z` suffix, e.g. `2024-01-01T00:00:00.000000Z`
pub fn utc_timestamp(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Micros, true)
}
