//! The result of one diagnostic run.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::parse::{
    FirewallCounts, InterfaceRecord, NeighborRecord, PeerRecord, RouteRecord, SystemInfo,
};
use crate::target::DeviceTarget;

/// Everything collected from one device in one run.
///
/// A section is `None` when its category was not requested or the run did
/// not get that far, and `Some(vec![])` when it ran and found nothing.
#[derive(Debug, Serialize)]
pub struct DiagnosticReport {
    pub target: Arc<DeviceTarget>,
    pub connected: bool,
    pub error: Option<String>,
    pub system: Option<SystemInfo>,
    pub interfaces: Option<Vec<InterfaceRecord>>,
    pub routes: Option<Vec<RouteRecord>>,
    pub firewall: Option<FirewallCounts>,
    pub bgp_peers: Option<Vec<PeerRecord>>,
    pub ospf_neighbors: Option<Vec<NeighborRecord>>,
    pub timestamp: DateTime<Utc>,
}

/// Parsed results gathered while a session is open.
#[derive(Debug, Default)]
pub(crate) struct Sections {
    pub system: Option<SystemInfo>,
    pub interfaces: Option<Vec<InterfaceRecord>>,
    pub routes: Option<Vec<RouteRecord>>,
    pub firewall: Option<FirewallCounts>,
    pub bgp_peers: Option<Vec<PeerRecord>>,
    pub ospf_neighbors: Option<Vec<NeighborRecord>>,
}

impl DiagnosticReport {
    fn empty(target: Arc<DeviceTarget>, timestamp: DateTime<Utc>) -> Self {
        Self {
            target,
            connected: false,
            error: None,
            system: None,
            interfaces: None,
            routes: None,
            firewall: None,
            bgp_peers: None,
            ospf_neighbors: None,
            timestamp,
        }
    }

    /// The session could not be opened.
    pub fn connection_failed(
        target: Arc<DeviceTarget>,
        timestamp: DateTime<Utc>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::empty(target, timestamp)
        }
    }

    /// The session opened but a required command failed. Nothing collected
    /// before the failure is kept.
    pub fn command_failed(
        target: Arc<DeviceTarget>,
        timestamp: DateTime<Utc>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            connected: true,
            error: Some(error.into()),
            ..Self::empty(target, timestamp)
        }
    }

    pub(crate) fn completed(
        target: Arc<DeviceTarget>,
        timestamp: DateTime<Utc>,
        sections: Sections,
    ) -> Self {
        Self {
            target,
            connected: true,
            error: None,
            system: sections.system,
            interfaces: sections.interfaces,
            routes: sections.routes,
            firewall: sections.firewall,
            bgp_peers: sections.bgp_peers,
            ospf_neighbors: sections.ospf_neighbors,
            timestamp,
        }
    }

    /// True when the device could not be reached or a command failed.
    pub fn has_failure(&self) -> bool {
        !self.connected || self.error.is_some()
    }
}
