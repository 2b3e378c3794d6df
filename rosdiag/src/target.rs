//! Device targets: where and how to reach one router.

use std::fmt;

use secrecy::SecretString;
use serde::Serialize;

/// One router in the fleet.
///
/// Loaded once from configuration and shared read-only (usually behind an
/// `Arc`) by every run against it. The password is never serialized and is
/// redacted from `Debug` output.
#[derive(Serialize)]
pub struct DeviceTarget {
    /// Display name; unique within a fleet.
    pub name: String,

    /// Hostname or IP address.
    pub host: String,

    /// SSH port.
    pub port: u16,

    /// SSH username.
    pub username: String,

    /// SSH password.
    #[serde(skip_serializing)]
    pub password: SecretString,
}

impl DeviceTarget {
    /// Create a target.
    pub fn new(
        name: impl Into<String>,
        host: impl Into<String>,
        port: u16,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            host: host.into(),
            port,
            username: username.into(),
            password: SecretString::from(password.into()),
        }
    }

    /// `host:port` form used in logs and reports.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Whether this target belongs to `group`, by the `GROUP - ...` naming
    /// convention (case-insensitive name prefix).
    pub fn in_group(&self, group: &str) -> bool {
        self.name.to_uppercase().starts_with(&group.to_uppercase())
    }
}

impl fmt::Debug for DeviceTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceTarget")
            .field("name", &self.name)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}
