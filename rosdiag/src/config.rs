//! Fleet configuration: the router list and SSH settings.
//!
//! The file is JSON:
//!
//! ```json
//! {
//!   "routers": [
//!     { "name": "core-1", "host": "10.0.0.1", "port": 22,
//!       "username": "admin", "password": "secret" }
//!   ],
//!   "ssh": { "timeout_secs": 10, "host_key_verification": "accept-new" }
//! }
//! ```
//!
//! Everything is validated up front so a bad file fails before any device
//! is contacted.

use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::target::DeviceTarget;
use crate::transport::HostKeyVerification;

/// Default configuration file name.
pub const DEFAULT_CONFIG_PATH: &str = "routers.json";

/// SSH settings shared by every router in the fleet.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SshSettings {
    /// Connection timeout in seconds.
    pub timeout_secs: u64,

    /// Keepalive interval in seconds.
    pub keepalive_secs: u64,

    /// Host key verification mode.
    pub host_key_verification: HostKeyVerification,

    /// known_hosts file; `None` uses `~/.ssh/known_hosts`.
    pub known_hosts_path: Option<PathBuf>,
}

impl SshSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn keepalive(&self) -> Duration {
        Duration::from_secs(self.keepalive_secs)
    }
}

impl Default for SshSettings {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            keepalive_secs: 5,
            host_key_verification: HostKeyVerification::default(),
            known_hosts_path: None,
        }
    }
}

/// A router entry exactly as written in the file, before validation.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterEntry {
    pub name: Option<String>,
    pub host: Option<String>,
    pub port: Option<i64>,
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    routers: Vec<RouterEntry>,
    #[serde(default)]
    ssh: SshSettings,
}

/// Validated fleet configuration.
#[derive(Debug)]
pub struct FleetConfig {
    routers: Vec<Arc<DeviceTarget>>,
    ssh: SshSettings,
}

impl FleetConfig {
    /// Load and validate a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                ConfigError::NotFound {
                    path: path.to_path_buf(),
                }
            } else {
                ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;
        let config = Self::from_json(&content)?;
        debug!(
            "Loaded {} router(s) from {}",
            config.routers.len(),
            path.display()
        );
        Ok(config)
    }

    /// Parse and validate configuration text.
    pub fn from_json(content: &str) -> Result<Self> {
        let raw: RawConfig = serde_json::from_str(content).map_err(ConfigError::Parse)?;

        if raw.routers.is_empty() {
            return Err(ConfigError::NoRouters.into());
        }

        let mut seen = HashSet::new();
        let mut routers = Vec::with_capacity(raw.routers.len());
        for (index, entry) in raw.routers.into_iter().enumerate() {
            let target = validate_router(entry, index)?;
            if !seen.insert(target.name.clone()) {
                return Err(ConfigError::DuplicateName { name: target.name }.into());
            }
            routers.push(Arc::new(target));
        }

        Ok(Self {
            routers,
            ssh: raw.ssh,
        })
    }

    /// All routers, in file order.
    pub fn routers(&self) -> &[Arc<DeviceTarget>] {
        &self.routers
    }

    /// SSH settings.
    pub fn ssh(&self) -> &SshSettings {
        &self.ssh
    }

    /// Look up a router by exact name.
    pub fn router(&self, name: &str) -> Result<Arc<DeviceTarget>> {
        self.routers
            .iter()
            .find(|router| router.name == name)
            .cloned()
            .ok_or_else(|| {
                ConfigError::UnknownRouter {
                    name: name.to_string(),
                }
                .into()
            })
    }

    /// Routers whose name starts with `group` (case-insensitive), in file order.
    pub fn group(&self, group: &str) -> Result<Vec<Arc<DeviceTarget>>> {
        let members: Vec<_> = self
            .routers
            .iter()
            .filter(|router| router.in_group(group))
            .cloned()
            .collect();
        if members.is_empty() {
            return Err(ConfigError::UnknownGroup {
                group: group.to_string(),
            }
            .into());
        }
        Ok(members)
    }
}

fn required(value: Option<String>, index: usize, field: &'static str) -> Result<String> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::MissingField { index, field }.into()),
    }
}

fn validate_router(entry: RouterEntry, index: usize) -> Result<DeviceTarget> {
    let name = required(entry.name, index, "name")?;
    let host = required(entry.host, index, "host")?;
    let port = entry
        .port
        .ok_or(ConfigError::MissingField {
            index,
            field: "port",
        })?;
    let username = required(entry.username, index, "username")?;
    let password = required(entry.password, index, "password")?;

    let port = u16::try_from(port)
        .ok()
        .filter(|port| *port >= 1)
        .ok_or(ConfigError::InvalidPort {
            name: name.clone(),
            port,
        })?;

    Ok(DeviceTarget::new(name, host, port, username, password))
}
