//! `/interface print stats`.

use serde::Serialize;

use super::fields::Fields;
use super::record::{PartialRecord, collect_records, set};

/// One interface with its link flags and traffic counters.
///
/// Counters are kept exactly as printed; RouterOS mixes plain integers with
/// spaced and suffixed forms, so no numeric conversion is attempted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InterfaceRecord {
    pub name: String,
    /// The interface `type` (ether, bridge, vlan, pppoe-out, ...).
    #[serde(rename = "type")]
    pub kind: String,
    pub running: bool,
    pub disabled: bool,
    pub rx_bytes: Option<String>,
    pub tx_bytes: Option<String>,
    pub rx_packets: Option<String>,
    pub tx_packets: Option<String>,
}

#[derive(Default)]
struct PartialInterface {
    name: Option<String>,
    kind: Option<String>,
    running: bool,
    disabled: bool,
    rx_bytes: Option<String>,
    tx_bytes: Option<String>,
    rx_packets: Option<String>,
    tx_packets: Option<String>,
}

impl PartialRecord for PartialInterface {
    type Record = InterfaceRecord;

    fn absorb(&mut self, fields: &Fields<'_>) {
        set(&mut self.name, fields.non_empty("name"));
        set(&mut self.kind, fields.non_empty("type"));
        if let Some(running) = fields.flag("running") {
            self.running = running;
        }
        if let Some(disabled) = fields.flag("disabled") {
            self.disabled = disabled;
        }
        set(&mut self.rx_bytes, fields.non_empty("rx-byte"));
        set(&mut self.tx_bytes, fields.non_empty("tx-byte"));
        set(&mut self.rx_packets, fields.non_empty("rx-packet"));
        set(&mut self.tx_packets, fields.non_empty("tx-packet"));
    }

    fn complete(self) -> Option<InterfaceRecord> {
        Some(InterfaceRecord {
            name: self.name?,
            kind: self.kind?,
            running: self.running,
            disabled: self.disabled,
            rx_bytes: self.rx_bytes,
            tx_bytes: self.tx_bytes,
            rx_packets: self.rx_packets,
            tx_packets: self.tx_packets,
        })
    }
}

/// Parse interface statistics into records, in input order.
///
/// Records without both a name and a type are dropped.
pub fn parse_interfaces(text: &str) -> Vec<InterfaceRecord> {
    collect_records::<PartialInterface>(text)
}
