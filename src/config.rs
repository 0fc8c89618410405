use figment2::{
    Figment,
    providers::{Env, Format, Toml},
};
use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::domain::status::models::container::{
    ContainerName, ManagedContainers, ManagedContainersError,
};

pub const ENV_PREFIX: &str = "VERSION_SERVER_";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Figment(#[from] Box<figment2::Error>),
    #[error("invalid managed_containers: {0}")]
    ManagedContainers(#[from] ManagedContainersError),
    #[error("runtime.timeout_secs must be greater than zero")]
    ZeroTimeout,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Runtime {
    #[serde(default = "default_runtime_binary")]
    pub binary: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Group id to switch to so the runtime socket is accessible
    #[serde(default)]
    pub gid: Option<u32>,
}

impl Runtime {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self {
            binary: default_runtime_binary(),
            timeout_secs: default_timeout_secs(),
            gid: None,
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Config {
    #[serde(default = "default_bind_address")]
    pub bind_address: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_managed_containers")]
    pub managed_containers: Vec<ContainerName>,
    #[serde(default = "default_state_file")]
    pub state_file: PathBuf,
    #[serde(default)]
    pub runtime: Runtime,
}

fn default_bind_address() -> IpAddr {
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
}

fn default_port() -> u16 {
    8081
}

fn default_managed_containers() -> Vec<ContainerName> {
    vec![ContainerName::new("buckman-proxy")]
}

fn default_state_file() -> PathBuf {
    PathBuf::from("/var/run/image-poller-state.json")
}

fn default_runtime_binary() -> String {
    "podman".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

impl Config {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_address, self.port)
    }

    pub fn managed_containers(&self) -> Result<ManagedContainers, ConfigError> {
        Ok(ManagedContainers::new(self.managed_containers.clone())?)
    }

    fn validate(self) -> Result<Self, ConfigError> {
        self.managed_containers()?;
        if self.runtime.timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(self)
    }
}

/// Loads defaults, then the toml file at `config_path` (if present), then `VERSION_SERVER_*`
/// environment variables. Nested keys are separated by `__`.
pub fn load_config(config_path: &Path) -> Result<Config, ConfigError> {
    let config: Config = Figment::new()
        .merge(Toml::file(config_path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .extract()
        .map_err(Box::new)?;
    config.validate()
}
