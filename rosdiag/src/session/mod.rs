//! Remote command sessions.
//!
//! The diagnostics layer only ever talks to a device through these two
//! traits, so it can be driven by the SSH implementation in production and
//! by an in-memory script in tests.

mod ssh;

pub use ssh::{SshConnector, SshSession};

use std::future::Future;

use indexmap::IndexMap;
use log::warn;

use crate::error::Result;
use crate::target::DeviceTarget;

/// Prefix marking a failed command's entry in [`RemoteSession::run_all`] output.
pub const ERROR_MARKER: &str = "Error: ";

/// Command used to verify a session end to end.
pub const IDENTITY_COMMAND: &str = "/system identity print";

/// An authenticated command channel to one device.
pub trait RemoteSession: Send {
    /// Run one command and return its output.
    ///
    /// Fails with [`Error::Command`](crate::Error::Command) when the device
    /// reports an error for the command.
    fn run(&mut self, command: &str) -> impl Future<Output = Result<String>> + Send;

    /// Run commands in order, one at a time, and collect every output.
    ///
    /// Never fails: a command that errors is recorded as
    /// `"Error: <message>"` under its own key and the next command still runs.
    fn run_all(
        &mut self,
        commands: &[&str],
    ) -> impl Future<Output = IndexMap<String, String>> + Send {
        async move {
            let mut results = IndexMap::with_capacity(commands.len());
            for command in commands {
                let output = match self.run(command).await {
                    Ok(output) => output,
                    Err(e) => format!("{ERROR_MARKER}{e}"),
                };
                results.insert((*command).to_string(), output);
            }
            results
        }
    }

    /// Close the session. Calling this more than once is a no-op.
    fn close(&mut self) -> impl Future<Output = Result<()>> + Send;
}

/// Opens sessions to device targets.
pub trait Connector: Send + Sync {
    /// Session type produced by this connector.
    type Session: RemoteSession;

    /// Connect and authenticate to `target`.
    ///
    /// Fails with [`Error::Transport`](crate::Error::Transport) when the
    /// device is unreachable or rejects the credentials.
    fn open(&self, target: &DeviceTarget) -> impl Future<Output = Result<Self::Session>> + Send;
}

/// Open a session, print the device identity, and close again.
///
/// Returns the identity output on success.
pub async fn test_connection<C: Connector>(connector: &C, target: &DeviceTarget) -> Result<String> {
    let mut session = connector.open(target).await?;
    let identity = session.run(IDENTITY_COMMAND).await;
    if let Err(e) = session.close().await {
        warn!("{}: failed to close session: {}", target.name, e);
    }
    identity
}
