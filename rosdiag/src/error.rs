//! Error types for rosdiag.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Main error type for rosdiag operations.
#[derive(Error, Debug)]
pub enum Error {
    /// SSH transport-level errors (the session could not be established)
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// A command failed on an open session
    #[error("Command error: {0}")]
    Command(#[from] CommandError),

    /// Fleet configuration errors
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Remediation script errors
    #[error("Remediation error: {0}")]
    Remediation(#[from] RemediationError),

    /// Report or config serialization failed
    #[error("JSON encoding error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Transport layer errors (SSH connection, authentication).
#[derive(Error, Debug)]
pub enum TransportError {
    /// SSH handshake or protocol error
    #[error("SSH error: {0}")]
    Ssh(#[from] russh::Error),

    /// Authentication failed
    #[error("Authentication failed for user '{user}'")]
    AuthenticationFailed { user: String },

    /// Host is not present in known_hosts and verification is strict
    #[error("Host key for {host}:{port} is not in known_hosts")]
    HostKeyUnknown { host: String, port: u16 },

    /// Host key differs from the one recorded in known_hosts
    #[error("Host key for {host}:{port} changed (known_hosts line {line})")]
    HostKeyChanged { host: String, port: u16, line: usize },

    /// known_hosts could not be read or written
    #[error("known_hosts error: {0}")]
    KnownHosts(String),

    /// Connection attempt timed out
    #[error("Connection to {host}:{port} timed out after {timeout:?}")]
    Timeout {
        host: String,
        port: u16,
        timeout: std::time::Duration,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Errors raised by a single command on an open session.
#[derive(Error, Debug)]
pub enum CommandError {
    /// Session was closed or never opened
    #[error("Session not connected")]
    NotConnected,

    /// The device reported a failure for this command
    #[error("'{command}' failed: {message}")]
    Failed { command: String, message: String },

    /// The exec channel broke while running the command
    #[error("'{command}' channel error: {source}")]
    Channel {
        command: String,
        #[source]
        source: russh::Error,
    },
}

/// Fleet configuration errors. All are fatal before any device is contacted.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration file does not exist
    #[error("Configuration file not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// Configuration file could not be read
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Configuration file could not be written
    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Configuration file is not valid JSON or has the wrong shape
    #[error("Invalid configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// The routers array is empty
    #[error("Configuration must contain at least one router")]
    NoRouters,

    /// A router entry is missing a required field
    #[error("Router at index {index} is missing required field: {field}")]
    MissingField { index: usize, field: &'static str },

    /// Port outside 1..=65535
    #[error("Router \"{name}\" has invalid port: {port}")]
    InvalidPort { name: String, port: i64 },

    /// Two routers share a name
    #[error("Duplicate router name: \"{name}\"")]
    DuplicateName { name: String },

    /// No router with this name
    #[error("Router \"{name}\" not found in configuration")]
    UnknownRouter { name: String },

    /// No router name starts with this group prefix
    #[error("No routers found in group: {group}")]
    UnknownGroup { group: String },

    /// Category string not recognized
    #[error("Invalid category: {value} (valid: system, interfaces, routing, all)")]
    InvalidCategory { value: String },
}

/// Errors while preparing remediation scripts.
#[derive(Error, Debug)]
pub enum RemediationError {
    /// A required script is not present in the script directory
    #[error("Required script missing: {}", path.display())]
    MissingScript { path: PathBuf },

    /// Script could not be read
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Result type alias using rosdiag's Error.
pub type Result<T> = std::result::Result<T, Error>;
