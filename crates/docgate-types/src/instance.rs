//! Logical instance types: the fixed set of cluster roles.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A named cluster role. Each type is backed by its own connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstanceType {
    /// Metadata store: server instances, proxies, configuration, localization.
    Primary,
    /// Network-state store: users and network datastore.
    Network,
    /// Game-data store.
    Game,
}

impl InstanceType {
    /// Every known instance type, in startup order.
    pub const ALL: [InstanceType; 3] = [Self::Primary, Self::Network, Self::Game];

    /// Human-friendly name used in log lines.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Primary => "Primary",
            Self::Network => "Network",
            Self::Game => "Game",
        }
    }

    /// Key used to namespace this type's credentials in configuration.
    pub fn config_key(self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Network => "network",
            Self::Game => "game",
        }
    }
}

impl fmt::Display for InstanceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for InstanceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|ty| ty.config_key().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown instance type '{s}'"))
    }
}
