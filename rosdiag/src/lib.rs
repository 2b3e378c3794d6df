//! # rosdiag
//!
//! Async SSH diagnostics for MikroTik RouterOS fleets.
//!
//! rosdiag connects to routers over SSH, runs read-only `print` commands
//! and parses their output into typed records: system health, interface
//! state and counters, routes, firewall rule counts, BGP peers and OSPF
//! neighbors.
//!
//! ## Features
//!
//! - Async SSH sessions via russh, one exec channel per command
//! - Tolerant parsers for RouterOS `print` output (pure functions over text)
//! - Concurrent fleet runs with per-device failure isolation
//! - JSON fleet configuration with group selection
//! - WinBox address-book import and remediation script push
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use rosdiag::{CategorySet, FleetConfig, SshConnector, run_diagnostics_on_routers};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), rosdiag::Error> {
//!     let config = FleetConfig::load("routers.json")?;
//!     let connector = Arc::new(SshConnector::new(config.ssh().clone()));
//!
//!     let reports =
//!         run_diagnostics_on_routers(connector, config.routers(), &CategorySet::all()).await;
//!
//!     for report in &reports {
//!         println!("{}: connected={}", report.target.name, report.connected);
//!     }
//!     Ok(())
//! }
//! ```

pub mod channel;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod import;
pub mod parse;
pub mod platform;
pub mod remediation;
pub mod render;
pub mod session;
pub mod target;
pub mod transport;

// Re-export main types for convenience
pub use config::{FleetConfig, SshSettings};
pub use diagnostics::{
    Category, CategorySet, DiagnosticReport, run_diagnostics, run_diagnostics_on_routers,
};
pub use error::{Error, Result};
pub use parse::{
    FirewallCounts, InterfaceRecord, NeighborRecord, PeerRecord, RouteRecord, SystemInfo,
};
pub use platform::PlatformDefinition;
pub use session::{Connector, RemoteSession, SshConnector, SshSession, test_connection};
pub use target::DeviceTarget;
pub use transport::{HostKeyVerification, SshConfig};
