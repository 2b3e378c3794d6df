//! SSH connection configuration.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use serde::Deserialize;

/// Host key verification mode, analogous to OpenSSH's `StrictHostKeyChecking`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HostKeyVerification {
    /// Reject unknown and changed keys. Connection fails if the host
    /// is not already in known_hosts.
    Strict,

    /// Accept and auto-learn unknown keys, but reject changed keys.
    /// This is the default and matches common SSH client behavior.
    #[default]
    AcceptNew,

    /// Accept all keys without checking. For testing and lab use only.
    Disabled,
}

/// SSH connection configuration for one device.
#[derive(Debug)]
pub struct SshConfig {
    /// Target host (hostname or IP address).
    pub host: String,

    /// SSH port.
    pub port: u16,

    /// Username for authentication.
    pub username: String,

    /// Password for authentication.
    pub password: SecretString,

    /// Connection (and inactivity) timeout.
    pub timeout: Duration,

    /// Interval between SSH keepalive messages.
    pub keepalive: Duration,

    /// Host key verification mode.
    pub host_key_verification: HostKeyVerification,

    /// Path to known_hosts file. `None` uses the user's default file.
    pub known_hosts_path: Option<PathBuf>,
}

impl SshConfig {
    /// Get the socket address for connection.
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
