//! `/ip firewall ... print count-only`.

use serde::Serialize;

/// Rule counts for the filter and NAT tables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FirewallCounts {
    pub filter_rules: u64,
    pub nat_rules: u64,
}

/// The first run of decimal digits in `text`, or 0 if there is none (or it
/// does not fit in a `u64`).
pub fn parse_firewall_count(text: &str) -> u64 {
    let Some(start) = text.find(|c: char| c.is_ascii_digit()) else {
        return 0;
    };
    let digits = &text[start..];
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse().unwrap_or(0)
}
