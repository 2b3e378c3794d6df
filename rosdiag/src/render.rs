//! Human-readable rendering of diagnostic reports.

use std::fmt::Write;

use crate::diagnostics::DiagnosticReport;
use crate::error::Result;

/// Routes listed per device before the rest are summarised.
const ROUTE_PREVIEW: usize = 5;

/// Render reports as a plain-text document.
pub fn render_text(reports: &[DiagnosticReport]) -> String {
    let mut out = String::new();
    let rule = "=".repeat(80);

    let _ = writeln!(out, "\n{rule}");
    let _ = writeln!(out, "RouterOS Diagnostics Report");
    let _ = writeln!(out, "{rule}");

    for report in reports {
        render_report(&mut out, report);
    }

    let _ = writeln!(out, "\n{rule}");
    out
}

/// Render reports as a pretty-printed JSON array.
pub fn render_json(reports: &[DiagnosticReport]) -> Result<String> {
    Ok(serde_json::to_string_pretty(reports)?)
}

fn render_report(out: &mut String, report: &DiagnosticReport) {
    let _ = writeln!(out, "\n Router: {}", report.target.name);
    let _ = writeln!(out, "   Host: {}", report.target.address());
    let _ = writeln!(out, "   Timestamp: {}\n", report.timestamp.to_rfc3339());

    if !report.connected {
        let error = report.error.as_deref().unwrap_or("Unknown error");
        let _ = writeln!(out, "   [FAIL] Connection failed: {error}\n");
        return;
    }

    let _ = writeln!(out, "   [ OK ] Connected successfully\n");

    if let Some(error) = &report.error {
        let _ = writeln!(out, "   [FAIL] Diagnostics aborted: {error}\n");
    }

    if let Some(system) = &report.system {
        let _ = writeln!(out, "   System Information:");
        let _ = writeln!(out, "     Version:      {}", system.version);
        let _ = writeln!(out, "     Board:        {}", system.board_name);
        let _ = writeln!(out, "     Architecture: {}", system.architecture);
        let _ = writeln!(out, "     CPU:          {}", system.cpu);
        let _ = writeln!(out, "     CPU Load:     {}", system.cpu_load);
        let _ = writeln!(
            out,
            "     Memory:       {} / {}",
            system.free_memory, system.total_memory
        );
        let _ = writeln!(out, "     Uptime:       {}\n", system.uptime);
    }

    if let Some(interfaces) = report.interfaces.as_ref().filter(|i| !i.is_empty()) {
        let _ = writeln!(out, "   Interfaces:");
        for iface in interfaces {
            let status = if iface.running {
                "UP"
            } else if iface.disabled {
                "DISABLED"
            } else {
                "DOWN"
            };
            let _ = writeln!(out, "     {:<20} {:<10} {}", iface.name, status, iface.kind);

            if iface.rx_bytes.is_some() || iface.tx_bytes.is_some() {
                let _ = writeln!(
                    out,
                    "       RX: {} bytes ({} packets)",
                    iface.rx_bytes.as_deref().unwrap_or("0"),
                    iface.rx_packets.as_deref().unwrap_or("0")
                );
                let _ = writeln!(
                    out,
                    "       TX: {} bytes ({} packets)",
                    iface.tx_bytes.as_deref().unwrap_or("0"),
                    iface.tx_packets.as_deref().unwrap_or("0")
                );
            }
        }
        let _ = writeln!(out);
    }

    if report.routes.is_some() || report.firewall.is_some() {
        render_routing(out, report);
    }

    let _ = writeln!(out, "   {}", "-".repeat(76));
}

fn render_routing(out: &mut String, report: &DiagnosticReport) {
    let _ = writeln!(out, "   Routing:");

    if let Some(routes) = report.routes.as_ref().filter(|r| !r.is_empty()) {
        let _ = writeln!(out, "     Routes: {} entries", routes.len());
        for route in routes.iter().take(ROUTE_PREVIEW) {
            let _ = writeln!(out, "       {:<20} via {}", route.dst_address, route.gateway);
        }
        if routes.len() > ROUTE_PREVIEW {
            let _ = writeln!(out, "       ... and {} more", routes.len() - ROUTE_PREVIEW);
        }
    }

    if let Some(firewall) = &report.firewall {
        let _ = writeln!(out, "     Firewall Filter Rules: {}", firewall.filter_rules);
        let _ = writeln!(out, "     NAT Rules: {}", firewall.nat_rules);
    }

    if let Some(peers) = report.bgp_peers.as_ref().filter(|p| !p.is_empty()) {
        let _ = writeln!(out, "     BGP Peers: {}", peers.len());
        for peer in peers {
            let _ = writeln!(
                out,
                "       {:<20} {:<20} {}",
                peer.name, peer.remote_address, peer.state
            );
        }
    }

    if let Some(neighbors) = report.ospf_neighbors.as_ref().filter(|n| !n.is_empty()) {
        let _ = writeln!(out, "     OSPF Neighbors: {}", neighbors.len());
        for neighbor in neighbors {
            let _ = writeln!(
                out,
                "       {:<20} {:<20} {}",
                neighbor.router_id, neighbor.address, neighbor.state
            );
        }
    }

    let _ = writeln!(out);
}
