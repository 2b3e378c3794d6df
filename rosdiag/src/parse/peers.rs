//! `/routing bgp peer print detail` and `/routing ospf neighbor print detail`.
//!
//! Both use the same multi-line layout as interfaces, each with its own pair
//! of required fields.

use serde::Serialize;

use super::fields::Fields;
use super::record::{PartialRecord, collect_records, set};

/// A BGP peer. `state` is empty when not printed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeerRecord {
    pub name: String,
    pub remote_address: String,
    pub state: String,
    pub uptime: Option<String>,
}

/// An OSPF neighbor. `state` is empty when not printed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NeighborRecord {
    pub router_id: String,
    pub address: String,
    pub state: String,
    pub priority: Option<String>,
}

#[derive(Default)]
struct PartialPeer {
    name: Option<String>,
    remote_address: Option<String>,
    state: Option<String>,
    uptime: Option<String>,
}

impl PartialRecord for PartialPeer {
    type Record = PeerRecord;

    fn absorb(&mut self, fields: &Fields<'_>) {
        set(&mut self.name, fields.non_empty("name"));
        set(&mut self.remote_address, fields.non_empty("remote-address"));
        set(&mut self.state, fields.non_empty("state"));
        set(&mut self.uptime, fields.non_empty("uptime"));
    }

    fn complete(self) -> Option<PeerRecord> {
        Some(PeerRecord {
            name: self.name?,
            remote_address: self.remote_address?,
            state: self.state.unwrap_or_default(),
            uptime: self.uptime,
        })
    }
}

#[derive(Default)]
struct PartialNeighbor {
    router_id: Option<String>,
    address: Option<String>,
    state: Option<String>,
    priority: Option<String>,
}

impl PartialRecord for PartialNeighbor {
    type Record = NeighborRecord;

    fn absorb(&mut self, fields: &Fields<'_>) {
        set(&mut self.router_id, fields.non_empty("router-id"));
        set(&mut self.address, fields.non_empty("address"));
        set(&mut self.state, fields.non_empty("state"));
        set(&mut self.priority, fields.non_empty("priority"));
    }

    fn complete(self) -> Option<NeighborRecord> {
        Some(NeighborRecord {
            router_id: self.router_id?,
            address: self.address?,
            state: self.state.unwrap_or_default(),
            priority: self.priority,
        })
    }
}

/// Parse BGP peers. Peers without both name and remote address are dropped.
pub fn parse_bgp_peers(text: &str) -> Vec<PeerRecord> {
    collect_records::<PartialPeer>(text)
}

/// Parse OSPF neighbors. Neighbors without both router-id and address are
/// dropped.
pub fn parse_ospf_neighbors(text: &str) -> Vec<NeighborRecord> {
    collect_records::<PartialNeighbor>(text)
}
