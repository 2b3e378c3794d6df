//! Diagnostic runs: which commands to send, and how results are gathered.
//!
//! A run against one device is strictly sequential. Runs against different
//! devices are independent tasks that share nothing but the read-only
//! target list.

mod category;
mod fleet;
mod orchestrator;
mod report;

pub use category::{
    BGP_PEERS, Category, CategorySet, FIREWALL_FILTER_COUNT, FIREWALL_NAT_COUNT, INTERFACE_STATS,
    OSPF_NEIGHBORS, ROUTES, SYSTEM_RESOURCE, SYSTEM_ROUTERBOARD,
};
pub use fleet::run_diagnostics_on_routers;
pub use orchestrator::{Absent, run_diagnostics};
pub use report::DiagnosticReport;
