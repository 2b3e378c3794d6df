//! Diagnostics across many devices at once.

use std::sync::Arc;

use chrono::Utc;
use log::{info, warn};
use tokio::task::JoinSet;

use super::category::CategorySet;
use super::orchestrator::run_diagnostics;
use super::report::DiagnosticReport;
use crate::session::Connector;
use crate::target::DeviceTarget;

/// Run diagnostics on every target concurrently, one task per device.
///
/// Returns one report per target in the same order as `targets`, once all
/// runs have finished. A failing device only affects its own report.
pub async fn run_diagnostics_on_routers<C>(
    connector: Arc<C>,
    targets: &[Arc<DeviceTarget>],
    categories: &CategorySet,
) -> Vec<DiagnosticReport>
where
    C: Connector + 'static,
{
    info!("Running diagnostics on {} router(s)", targets.len());

    let mut tasks = JoinSet::new();
    for (index, target) in targets.iter().enumerate() {
        let connector = connector.clone();
        let target = target.clone();
        let categories = categories.clone();
        tasks.spawn(async move {
            let report = run_diagnostics(connector.as_ref(), target, &categories).await;
            (index, report)
        });
    }

    let mut slots: Vec<Option<DiagnosticReport>> = targets.iter().map(|_| None).collect();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((index, report)) => slots[index] = Some(report),
            Err(e) => warn!("Diagnostic task did not complete: {}", e),
        }
    }

    slots
        .into_iter()
        .zip(targets)
        .map(|(slot, target)| {
            slot.unwrap_or_else(|| {
                DiagnosticReport::connection_failed(
                    target.clone(),
                    Utc::now(),
                    "diagnostic task panicked",
                )
            })
        })
        .collect()
}
