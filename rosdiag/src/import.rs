//! Conversion of a WinBox address-book export into a fleet config.
//!
//! Each non-blank line describes one router as `key=value` tokens:
//!
//! ```text
//! group=WISP host=192.0.2.10:8291 login=admin pwd=secret note=TOWER A
//! ```
//!
//! `note` is free text and runs until the next known key.

use std::collections::HashMap;
use std::sync::LazyLock;

use log::{debug, warn};
use regex::Regex;
use serde::Serialize;

use crate::config::RouterEntry;
use crate::error::Result;

const DEFAULT_PORT: u16 = 22;

static KEY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|\s)(group|host|login|pwd|note)=").expect("valid key regex")
});

/// Serialized shape of a fleet config file.
#[derive(Serialize)]
struct ConfigFile {
    routers: Vec<RouterEntry>,
}

/// One router recovered from an export line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportedRouter {
    pub name: String,
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
}

/// Split a line into its known keys and their raw values.
fn line_fields(line: &str) -> HashMap<&str, &str> {
    let keys: Vec<_> = KEY
        .captures_iter(line)
        .filter_map(|caps| {
            let key = caps.get(1)?;
            let whole = caps.get(0)?;
            Some((key.as_str(), whole.end()))
        })
        .collect();

    let mut fields = HashMap::new();
    for (i, (key, start)) in keys.iter().enumerate() {
        let end = keys
            .get(i + 1)
            .map(|(next, next_start)| next_start - next.len() - 1)
            .unwrap_or(line.len());
        let value = line[*start..end].trim();
        fields.entry(*key).or_insert(value);
    }
    fields
}

fn first_token(value: &str) -> &str {
    value.split_whitespace().next().unwrap_or("")
}

fn split_host(value: &str) -> Option<(String, u16)> {
    match value.rsplit_once(':') {
        Some((host, port)) => {
            let port = port.parse().ok().filter(|p| *p != 0)?;
            Some((host.to_string(), port))
        }
        None => Some((value.to_string(), DEFAULT_PORT)),
    }
}

fn parse_line(line: &str) -> Option<ImportedRouter> {
    let fields = line_fields(line);

    let host_value = first_token(fields.get("host")?);
    let username = first_token(fields.get("login")?);
    let password = first_token(fields.get("pwd")?);
    if host_value.is_empty() || username.is_empty() || password.is_empty() {
        return None;
    }

    let Some((host, port)) = split_host(host_value) else {
        warn!("Skipping '{}': invalid port", host_value);
        return None;
    };

    let group = fields.get("group").map(|g| first_token(g)).unwrap_or("");
    let note = fields.get("note").copied().unwrap_or("");

    let label = if note.is_empty() { host.as_str() } else { note };
    let name = if group.is_empty() {
        label.to_string()
    } else {
        format!("{group} - {label}")
    };

    Some(ImportedRouter {
        name,
        host,
        port,
        username: username.to_string(),
        password: password.to_string(),
    })
}

/// Parse an export. Lines without a host, login and password are skipped.
pub fn parse_winbox_export(text: &str) -> Vec<ImportedRouter> {
    let routers: Vec<_> = text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(parse_line)
        .collect();
    debug!("Parsed {} router(s) from export", routers.len());
    routers
}

/// Count routers per group (the name before `" - "`), largest group first.
/// Ties keep the order in which groups first appear.
pub fn group_counts(routers: &[ImportedRouter]) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for router in routers {
        let group = router
            .name
            .split_once(" - ")
            .map(|(group, _)| group)
            .unwrap_or("Ungrouped");
        match counts.iter_mut().find(|(name, _)| name == group) {
            Some((_, count)) => *count += 1,
            None => counts.push((group.to_string(), 1)),
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

/// Render imported routers as a fleet config file.
pub fn to_config_json(routers: &[ImportedRouter]) -> Result<String> {
    let config = ConfigFile {
        routers: routers
            .iter()
            .map(|r| RouterEntry {
                name: Some(r.name.clone()),
                host: Some(r.host.clone()),
                port: Some(i64::from(r.port)),
                username: Some(r.username.clone()),
                password: Some(r.password.clone()),
            })
            .collect(),
    };
    Ok(serde_json::to_string_pretty(&config)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FleetConfig;

    const EXPORT: &str = "\
group=WISP host=192.0.2.10:9091 login=ops pwd=example note=TOWER A
group=WISP host=192.0.2.11 login=ops pwd=example
group=CORE host=192.0.2.1 login=admin pwd=example note=Main PE

group=WISP host=192.0.2.12 login=ops
note=orphan line without host
";

    #[test]
    fn test_parse_export() {
        let routers = parse_winbox_export(EXPORT);
        assert_eq!(routers.len(), 3);

        assert_eq!(routers[0].name, "WISP - TOWER A");
        assert_eq!(routers[0].host, "192.0.2.10");
        assert_eq!(routers[0].port, 9091);

        assert_eq!(routers[1].name, "WISP - 192.0.2.11");
        assert_eq!(routers[1].port, 22);

        assert_eq!(routers[2].name, "CORE - Main PE");
        assert_eq!(routers[2].username, "admin");
    }

    #[test]
    fn test_note_before_other_keys() {
        let routers = parse_winbox_export("note=Site B uplink host=192.0.2.5 login=a pwd=b");
        assert_eq!(routers.len(), 1);
        assert_eq!(routers[0].name, "Site B uplink");
    }

    #[test]
    fn test_invalid_port_skipped() {
        let routers = parse_winbox_export("host=192.0.2.5:notaport login=a pwd=b");
        assert!(routers.is_empty());
    }

    #[test]
    fn test_group_counts_sorted() {
        let routers = parse_winbox_export(EXPORT);
        let counts = group_counts(&routers);
        assert_eq!(
            counts,
            vec![("WISP".to_string(), 2), ("CORE".to_string(), 1)]
        );
    }

    #[test]
    fn test_config_json_loads() {
        let routers = parse_winbox_export(EXPORT);
        let json = to_config_json(&routers).unwrap();
        let config = FleetConfig::from_json(&json).unwrap();
        assert_eq!(config.routers().len(), 3);
        assert_eq!(config.router("WISP - TOWER A").unwrap().port, 9091);
    }
}
