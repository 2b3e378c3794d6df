//! Diagnostic categories and the commands each one runs.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::{ConfigError, Error};

pub const SYSTEM_RESOURCE: &str = "/system resource print";
pub const SYSTEM_ROUTERBOARD: &str = "/system routerboard print";
pub const INTERFACE_STATS: &str = "/interface print stats";
pub const ROUTES: &str = "/ip route print detail";
pub const FIREWALL_FILTER_COUNT: &str = "/ip firewall filter print count-only";
pub const FIREWALL_NAT_COUNT: &str = "/ip firewall nat print count-only";
pub const BGP_PEERS: &str = "/routing bgp peer print detail";
pub const OSPF_NEIGHBORS: &str = "/routing ospf neighbor print detail";

/// A group of related probes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Resource usage, version and board.
    System,
    /// Interface flags and counters.
    Interfaces,
    /// Routes, firewall rule counts, BGP peers and OSPF neighbors.
    Routing,
}

impl Category {
    /// Every category, in default run order.
    pub const ALL: [Category; 3] = [Category::System, Category::Interfaces, Category::Routing];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::System => "system",
            Category::Interfaces => "interfaces",
            Category::Routing => "routing",
        }
    }

    /// Commands issued for this category, in execution order. BGP and OSPF
    /// are optional probes and run last.
    pub fn commands(&self) -> &'static [&'static str] {
        match self {
            Category::System => &[SYSTEM_RESOURCE, SYSTEM_ROUTERBOARD],
            Category::Interfaces => &[INTERFACE_STATS],
            Category::Routing => &[
                ROUTES,
                FIREWALL_FILTER_COUNT,
                FIREWALL_NAT_COUNT,
                BGP_PEERS,
                OSPF_NEIGHBORS,
            ],
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "system" => Ok(Category::System),
            "interfaces" => Ok(Category::Interfaces),
            "routing" => Ok(Category::Routing),
            _ => Err(ConfigError::InvalidCategory {
                value: s.to_string(),
            }
            .into()),
        }
    }
}

/// Ordered, duplicate-free set of categories to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorySet(Vec<Category>);

impl CategorySet {
    /// All categories.
    pub fn all() -> Self {
        Self(Category::ALL.to_vec())
    }

    pub fn iter(&self) -> impl Iterator<Item = Category> + '_ {
        self.0.iter().copied()
    }

    pub fn contains(&self, category: Category) -> bool {
        self.0.contains(&category)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for CategorySet {
    fn default() -> Self {
        Self::all()
    }
}

impl FromIterator<Category> for CategorySet {
    fn from_iter<I: IntoIterator<Item = Category>>(iter: I) -> Self {
        let mut categories = Vec::new();
        for category in iter {
            if !categories.contains(&category) {
                categories.push(category);
            }
        }
        Self(categories)
    }
}

/// Parses `system`, `interfaces`, `routing`, `all`, or a comma-separated
/// list of the first three.
impl FromStr for CategorySet {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(Self::all());
        }
        s.split(',').map(str::parse).collect()
    }
}

impl fmt::Display for CategorySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<_> = self.iter().map(|c| c.as_str()).collect();
        f.write_str(&names.join(","))
    }
}
