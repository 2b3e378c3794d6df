//! Parsers for RouterOS `print` output.
//!
//! Every parser is a pure function over text and never fails: missing
//! fields become defaults and incomplete records are left out.
//!
//! Two default policies coexist:
//! [`SystemInfo`] fields fall back to `"unknown"`, while optional string
//! fields on routes, peers and neighbors fall back to `""`.

pub mod fields;
mod firewall;
mod interfaces;
mod peers;
mod record;
mod routes;
mod system;

pub use firewall::{FirewallCounts, parse_firewall_count};
pub use interfaces::{InterfaceRecord, parse_interfaces};
pub use peers::{NeighborRecord, PeerRecord, parse_bgp_peers, parse_ospf_neighbors};
pub use routes::{RouteRecord, parse_routes};
pub use system::{SystemInfo, UNKNOWN, parse_system_info};
