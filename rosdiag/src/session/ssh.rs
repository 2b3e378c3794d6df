//! SSH-backed sessions.

use std::sync::Arc;

use log::{debug, warn};
use secrecy::{ExposeSecret, SecretString};

use super::{Connector, RemoteSession};
use crate::config::SshSettings;
use crate::error::{CommandError, Result};
use crate::platform::{PlatformDefinition, routeros};
use crate::target::DeviceTarget;
use crate::transport::{SshConfig, SshTransport};

/// Opens [`SshSession`]s using fleet-wide SSH settings.
#[derive(Debug, Clone)]
pub struct SshConnector {
    settings: SshSettings,
    platform: Arc<PlatformDefinition>,
}

impl SshConnector {
    /// Create a connector for RouterOS devices.
    pub fn new(settings: SshSettings) -> Self {
        Self {
            settings,
            platform: Arc::new(routeros::platform()),
        }
    }

    /// Use a different platform definition for failure detection.
    pub fn with_platform(mut self, platform: PlatformDefinition) -> Self {
        self.platform = Arc::new(platform);
        self
    }

    fn ssh_config(&self, target: &DeviceTarget) -> SshConfig {
        SshConfig {
            host: target.host.clone(),
            port: target.port,
            username: target.username.clone(),
            password: SecretString::from(target.password.expose_secret().to_owned()),
            timeout: self.settings.timeout(),
            keepalive: self.settings.keepalive(),
            host_key_verification: self.settings.host_key_verification.clone(),
            known_hosts_path: self.settings.known_hosts_path.clone(),
        }
    }
}

impl Connector for SshConnector {
    type Session = SshSession;

    async fn open(&self, target: &DeviceTarget) -> Result<SshSession> {
        let transport = SshTransport::connect(self.ssh_config(target)).await?;
        debug!("{}: session open", target.name);
        Ok(SshSession {
            name: target.name.clone(),
            transport: Some(transport),
            platform: self.platform.clone(),
        })
    }
}

/// A live SSH session to one device. Every command gets its own exec channel.
pub struct SshSession {
    name: String,
    /// `None` once closed.
    transport: Option<SshTransport>,
    platform: Arc<PlatformDefinition>,
}

impl RemoteSession for SshSession {
    async fn run(&mut self, command: &str) -> Result<String> {
        let transport = self.transport.as_ref().ok_or(CommandError::NotConnected)?;

        debug!("{}: running '{}'", self.name, command);
        let output = transport
            .exec(command)
            .await
            .map_err(|source| CommandError::Channel {
                command: command.to_string(),
                source,
            })?;

        let stderr = output.stderr.trim();
        if !stderr.is_empty() {
            return Err(CommandError::Failed {
                command: command.to_string(),
                message: stderr.to_string(),
            }
            .into());
        }

        if let Some(line) = self.platform.detect_failure(&output.stdout) {
            return Err(CommandError::Failed {
                command: command.to_string(),
                message: line.to_string(),
            }
            .into());
        }

        Ok(output.stdout)
    }

    async fn close(&mut self) -> Result<()> {
        if let Some(transport) = self.transport.take() {
            transport.close().await?;
        }
        Ok(())
    }
}

impl Drop for SshSession {
    fn drop(&mut self) {
        if self.transport.is_some() {
            warn!("{}: SshSession dropped without close()", self.name);
        }
    }
}
