//! Diagnostics for a single device.

use std::sync::Arc;

use chrono::Utc;
use log::{debug, info, warn};

use super::category::{
    BGP_PEERS, Category, CategorySet, FIREWALL_FILTER_COUNT, FIREWALL_NAT_COUNT, INTERFACE_STATS,
    OSPF_NEIGHBORS, ROUTES, SYSTEM_RESOURCE, SYSTEM_ROUTERBOARD,
};
use super::report::{DiagnosticReport, Sections};
use crate::error::Result;
use crate::parse::{
    FirewallCounts, parse_bgp_peers, parse_firewall_count, parse_interfaces,
    parse_ospf_neighbors, parse_routes, parse_system_info,
};
use crate::session::{Connector, RemoteSession};
use crate::target::DeviceTarget;

/// An optional subsystem (BGP, OSPF) that the device does not have.
#[derive(Debug)]
pub struct Absent {
    pub command: &'static str,
    pub reason: String,
}

/// Run an optional probe. Any command failure means the subsystem is absent.
async fn probe<S, T>(
    session: &mut S,
    command: &'static str,
    parse: fn(&str) -> Vec<T>,
) -> std::result::Result<Vec<T>, Absent>
where
    S: RemoteSession,
{
    match session.run(command).await {
        Ok(output) => Ok(parse(&output)),
        Err(e) => Err(Absent {
            command,
            reason: e.to_string(),
        }),
    }
}

fn or_empty<T>(probed: std::result::Result<Vec<T>, Absent>, device: &str) -> Vec<T> {
    probed.unwrap_or_else(|absent| {
        debug!(
            "{}: '{}' unavailable, treating as empty: {}",
            device, absent.command, absent.reason
        );
        Vec::new()
    })
}

/// Run every requested category in order. The first failing required
/// command aborts the whole collection.
async fn collect<S: RemoteSession>(
    session: &mut S,
    device: &str,
    categories: &CategorySet,
) -> Result<Sections> {
    let mut sections = Sections::default();

    for category in categories.iter() {
        debug!("{}: {} -> {:?}", device, category, category.commands());
        match category {
            Category::System => {
                let resource = session.run(SYSTEM_RESOURCE).await?;
                let routerboard = session.run(SYSTEM_ROUTERBOARD).await?;
                sections.system = Some(parse_system_info(&resource, &routerboard));
            }
            Category::Interfaces => {
                let stats = session.run(INTERFACE_STATS).await?;
                sections.interfaces = Some(parse_interfaces(&stats));
            }
            Category::Routing => {
                let routes = session.run(ROUTES).await?;
                let filter = session.run(FIREWALL_FILTER_COUNT).await?;
                let nat = session.run(FIREWALL_NAT_COUNT).await?;

                sections.routes = Some(parse_routes(&routes));
                sections.firewall = Some(FirewallCounts {
                    filter_rules: parse_firewall_count(&filter),
                    nat_rules: parse_firewall_count(&nat),
                });

                let bgp = probe(session, BGP_PEERS, parse_bgp_peers).await;
                sections.bgp_peers = Some(or_empty(bgp, device));

                let ospf = probe(session, OSPF_NEIGHBORS, parse_ospf_neighbors).await;
                sections.ospf_neighbors = Some(or_empty(ospf, device));
            }
        }
    }

    Ok(sections)
}

/// Run `categories` against one device and report the outcome.
///
/// Never fails: connection and command errors are recorded in the report.
/// The session is closed before returning whenever it was opened.
pub async fn run_diagnostics<C: Connector>(
    connector: &C,
    target: Arc<DeviceTarget>,
    categories: &CategorySet,
) -> DiagnosticReport {
    let timestamp = Utc::now();
    info!(
        "{} ({}): running {}",
        target.name,
        target.address(),
        categories
    );

    let mut session = match connector.open(&target).await {
        Ok(session) => session,
        Err(e) => {
            warn!("{}: connection failed: {}", target.name, e);
            return DiagnosticReport::connection_failed(target, timestamp, e.to_string());
        }
    };

    let outcome = collect(&mut session, &target.name, categories).await;

    if let Err(e) = session.close().await {
        warn!("{}: failed to close session: {}", target.name, e);
    }

    match outcome {
        Ok(sections) => {
            info!("{}: diagnostics complete", target.name);
            DiagnosticReport::completed(target, timestamp, sections)
        }
        Err(e) => {
            warn!("{}: diagnostics aborted: {}", target.name, e);
            DiagnosticReport::command_failed(target, timestamp, e.to_string())
        }
    }
}
