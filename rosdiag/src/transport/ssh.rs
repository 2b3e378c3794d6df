//! SSH transport implementation using russh.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use log::{debug, trace, warn};
use russh::ChannelMsg;
use russh::client::{self, Handle};
use russh::keys::PublicKey;
use secrecy::ExposeSecret;

use super::config::{HostKeyVerification, SshConfig};
use crate::channel::{ExecOutput, OutputBuffer};
use crate::error::{Result, TransportError};

/// SSH transport wrapping russh client.
pub struct SshTransport {
    /// The russh session handle.
    session: Handle<SshHandler>,

    /// `host:port`, kept for log lines.
    addr: String,
}

impl SshTransport {
    /// Connect to the SSH server and authenticate.
    pub async fn connect(config: SshConfig) -> Result<Self> {
        let ssh_config = Arc::new(client::Config {
            inactivity_timeout: Some(config.timeout),
            keepalive_interval: Some(config.keepalive),
            ..Default::default()
        });

        let host_key_error: Arc<Mutex<Option<TransportError>>> = Arc::new(Mutex::new(None));

        let handler = SshHandler {
            host: config.host.clone(),
            port: config.port,
            host_key_verification: config.host_key_verification.clone(),
            known_hosts_path: config.known_hosts_path.clone(),
            host_key_error: host_key_error.clone(),
        };

        debug!("Connecting to {}", config.socket_addr());

        let mut session = tokio::time::timeout(
            config.timeout,
            client::connect(ssh_config, (config.host.as_str(), config.port), handler),
        )
        .await
        .map_err(|_| TransportError::Timeout {
            host: config.host.clone(),
            port: config.port,
            timeout: config.timeout,
        })?
        .map_err(|e| {
            // If check_server_key stored a detailed error, use that instead
            // of the generic russh::Error::UnknownKey
            let stored = host_key_error
                .lock()
                .ok()
                .and_then(|mut slot| slot.take());
            stored.unwrap_or(TransportError::Ssh(e))
        })?;

        let authenticated = session
            .authenticate_password(&config.username, config.password.expose_secret())
            .await
            .map_err(TransportError::Ssh)?
            .success();

        if !authenticated {
            return Err(TransportError::AuthenticationFailed {
                user: config.username,
            }
            .into());
        }

        Ok(Self {
            session,
            addr: config.socket_addr(),
        })
    }

    /// Run one command on a fresh exec channel and collect everything it writes.
    ///
    /// Returns once the server closes the channel, so stdout, stderr and the
    /// exit status are all complete.
    pub async fn exec(&self, command: &str) -> std::result::Result<ExecOutput, russh::Error> {
        let mut channel = self.session.channel_open_session().await?;
        channel.exec(true, command).await?;

        let mut buffer = OutputBuffer::new();
        while let Some(msg) = channel.wait().await {
            match msg {
                ChannelMsg::Data { ref data } => buffer.extend_stdout(data),
                // ext 1 is SSH_EXTENDED_DATA_STDERR
                ChannelMsg::ExtendedData { ref data, ext: 1 } => buffer.extend_stderr(data),
                ChannelMsg::ExitStatus { exit_status } => buffer.set_exit_status(exit_status),
                _ => {}
            }
        }

        trace!(
            "{}: '{}' returned {} bytes stdout, {} bytes stderr",
            self.addr,
            command,
            buffer.stdout_len(),
            buffer.stderr_len()
        );

        Ok(buffer.finish())
    }

    /// Close the connection.
    pub async fn close(self) -> Result<()> {
        self.session
            .disconnect(russh::Disconnect::ByApplication, "", "en")
            .await
            .map_err(TransportError::Ssh)?;
        debug!("Disconnected from {}", self.addr);
        Ok(())
    }
}

/// SSH client handler for russh.
struct SshHandler {
    host: String,
    port: u16,
    host_key_verification: HostKeyVerification,
    known_hosts_path: Option<PathBuf>,
    /// Stores a detailed host-key error so connect() can surface it
    /// instead of the generic russh::Error::UnknownKey.
    host_key_error: Arc<Mutex<Option<TransportError>>>,
}

impl SshHandler {
    /// Check the host key against known_hosts.
    ///
    /// Returns `Ok(true)` if matched, `Ok(false)` if host not found,
    /// `Err(TransportError::HostKeyChanged)` if key changed.
    fn check_known_hosts(&self, pubkey: &PublicKey) -> std::result::Result<bool, TransportError> {
        let result = if let Some(ref path) = self.known_hosts_path {
            russh::keys::check_known_hosts_path(&self.host, self.port, pubkey, path)
        } else {
            russh::keys::check_known_hosts(&self.host, self.port, pubkey)
        };

        match result {
            Ok(matched) => Ok(matched),
            Err(russh::keys::Error::KeyChanged { line }) => Err(TransportError::HostKeyChanged {
                host: self.host.clone(),
                port: self.port,
                line,
            }),
            Err(e) => Err(TransportError::KnownHosts(e.to_string())),
        }
    }

    /// Save a new host key to known_hosts.
    fn learn_host_key(&self, pubkey: &PublicKey) -> std::result::Result<(), TransportError> {
        let result = if let Some(ref path) = self.known_hosts_path {
            russh::keys::known_hosts::learn_known_hosts_path(&self.host, self.port, pubkey, path)
        } else {
            russh::keys::known_hosts::learn_known_hosts(&self.host, self.port, pubkey)
        };

        result.map_err(|e| TransportError::KnownHosts(e.to_string()))
    }

    fn reject(&self, error: TransportError) -> bool {
        if let Ok(mut slot) = self.host_key_error.lock() {
            *slot = Some(error);
        }
        false
    }
}

impl client::Handler for SshHandler {
    type Error = russh::Error;

    async fn check_server_key(
        &mut self,
        server_public_key: &PublicKey,
    ) -> std::result::Result<bool, Self::Error> {
        match self.host_key_verification {
            HostKeyVerification::Disabled => Ok(true),

            HostKeyVerification::AcceptNew => match self.check_known_hosts(server_public_key) {
                Ok(true) => Ok(true),
                Ok(false) => {
                    if let Err(e) = self.learn_host_key(server_public_key) {
                        warn!("Failed to save host key for {}: {}", self.host, e);
                    }
                    Ok(true)
                }
                Err(e) => Ok(self.reject(e)),
            },

            HostKeyVerification::Strict => match self.check_known_hosts(server_public_key) {
                Ok(true) => Ok(true),
                Ok(false) => Ok(self.reject(TransportError::HostKeyUnknown {
                    host: self.host.clone(),
                    port: self.port,
                })),
                Err(e) => Ok(self.reject(e)),
            },
        }
    }
}
