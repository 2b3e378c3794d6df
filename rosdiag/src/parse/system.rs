//! `/system resource print` and `/system routerboard print`.

use serde::Serialize;

use super::fields::label_value;

/// Value used for any system field missing from the output.
pub const UNKNOWN: &str = "unknown";

/// System health and identity.
///
/// All fields are free-form strings as printed by the device (`"1w2d3h"`,
/// `"212.4MiB"`, `"7.11.2 (stable)"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SystemInfo {
    pub uptime: String,
    pub version: String,
    pub cpu: String,
    pub cpu_load: String,
    pub free_memory: String,
    pub total_memory: String,
    pub architecture: String,
    pub board_name: String,
}

impl Default for SystemInfo {
    fn default() -> Self {
        Self {
            uptime: UNKNOWN.to_string(),
            version: UNKNOWN.to_string(),
            cpu: UNKNOWN.to_string(),
            cpu_load: UNKNOWN.to_string(),
            free_memory: UNKNOWN.to_string(),
            total_memory: UNKNOWN.to_string(),
            architecture: UNKNOWN.to_string(),
            board_name: UNKNOWN.to_string(),
        }
    }
}

/// Find the first non-empty value for `label`.
fn lookup<'a>(text: &'a str, label: &str) -> Option<&'a str> {
    text.lines()
        .filter_map(label_value)
        .find(|(l, v)| *l == label && !v.is_empty())
        .map(|(_, v)| v)
}

/// Build [`SystemInfo`] from the resource and routerboard outputs.
///
/// Every field comes from `resource` except `board_name`, where a non-empty
/// value in `routerboard` takes precedence. Never fails; missing fields are
/// [`UNKNOWN`].
pub fn parse_system_info(resource: &str, routerboard: &str) -> SystemInfo {
    let field = |label: &str| lookup(resource, label).unwrap_or(UNKNOWN).to_string();

    let board_name = lookup(routerboard, "board-name")
        .or_else(|| lookup(resource, "board-name"))
        .unwrap_or(UNKNOWN)
        .to_string();

    SystemInfo {
        uptime: field("uptime"),
        version: field("version"),
        cpu: field("cpu"),
        cpu_load: field("cpu-load"),
        free_memory: field("free-memory"),
        total_memory: field("total-memory"),
        architecture: field("architecture-name"),
        board_name,
    }
}
