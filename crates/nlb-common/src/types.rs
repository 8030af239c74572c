//! Neutral entities and enumerations

use crate::error::{NlbError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Extra key holding the backing pool id of a balancer
pub const EXTRA_POOL_ID: &str = "pool_id";
/// Extra key holding the network domain of a balancer
pub const EXTRA_NETWORK_DOMAIN_ID: &str = "network_domain_id";

/// Load balancing algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    /// Pick a member at random
    Random,
    /// Cycle through members in order
    RoundRobin,
    /// Member with the fewest open connections
    LeastConnections,
    /// Round robin biased by member weight
    WeightedRoundRobin,
    /// Least connections biased by member weight
    WeightedLeastConnections,
    /// Member answering fastest
    ShortestResponse,
    /// Same client address, same member
    PersistentIp,
}

impl Algorithm {
    /// Algorithm used when a provider reports something unmapped
    pub const DEFAULT: Algorithm = Algorithm::RoundRobin;

    /// All algorithms, in declaration order
    pub const ALL: [Algorithm; 7] = [
        Algorithm::Random,
        Algorithm::RoundRobin,
        Algorithm::LeastConnections,
        Algorithm::WeightedRoundRobin,
        Algorithm::WeightedLeastConnections,
        Algorithm::ShortestResponse,
        Algorithm::PersistentIp,
    ];

    /// Snake case name, as accepted by `FromStr`
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Random => "random",
            Self::RoundRobin => "round_robin",
            Self::LeastConnections => "least_connections",
            Self::WeightedRoundRobin => "weighted_round_robin",
            Self::WeightedLeastConnections => "weighted_least_connections",
            Self::ShortestResponse => "shortest_response",
            Self::PersistentIp => "persistent_ip",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Algorithm {
    type Err = NlbError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|a| a.as_str() == normalized)
            .ok_or_else(|| NlbError::InvalidInput(format!("unknown algorithm: {s}")))
    }
}

/// Load balancer state as observed from the provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum State {
    /// Serving traffic
    Running,
    /// A change is in progress
    Pending,
    /// Provider reported a state with no mapping
    Unknown,
    /// A change failed
    Error,
    /// Removed
    Deleted,
}

impl State {
    /// Lowercase label
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Pending => "pending",
            Self::Unknown => "unknown",
            Self::Error => "error",
            Self::Deleted => "deleted",
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Provider identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Provider {
    /// Dimension Data CloudControl
    DimensionData,
}

impl Provider {
    /// Short driver key
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DimensionData => "dimensiondata",
        }
    }
}

/// Neutral load balancer
///
/// Drivers build these from provider objects on every call; nothing is cached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadBalancer {
    /// Provider id of the balancer
    pub id: String,
    /// Display name
    pub name: String,
    /// Last observed state
    pub state: State,
    /// Listening address
    pub ip: String,
    /// `None` when the provider listens on any port
    pub port: Option<u16>,
    /// Driver that produced this balancer
    pub provider: Provider,
    /// Provider specific attributes
    pub extra: BTreeMap<String, String>,
}

impl LoadBalancer {
    /// Look up a required provider attribute
    pub fn extra_value(&self, key: &'static str) -> Result<&str> {
        self.extra
            .get(key)
            .map(String::as_str)
            .ok_or_else(|| NlbError::MissingExtra {
                balancer: self.id.clone(),
                key,
            })
    }
}

/// Neutral balancer member
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Member {
    /// Provider id, `None` until the member exists on the provider side
    pub id: Option<String>,
    /// Backend address
    pub ip: String,
    /// `None` means "use the balancer port"
    pub port: Option<u16>,
    /// Balancer this member belongs to
    pub balancer_id: Option<String>,
    /// Provider specific attributes, including `name` and `description`
    pub extra: BTreeMap<String, String>,
}

impl Member {
    /// Member that does not exist on the provider yet
    pub fn new(ip: impl Into<String>, port: Option<u16>) -> Self {
        Self {
            ip: ip.into(),
            port,
            ..Default::default()
        }
    }

    /// Set the provider id
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set the owning balancer
    pub fn with_balancer(mut self, balancer_id: impl Into<String>) -> Self {
        self.balancer_id = Some(balancer_id.into());
        self
    }

    /// Set the `name` extra
    pub fn with_name(self, name: impl Into<String>) -> Self {
        self.with_extra("name", name)
    }

    /// Set the `description` extra
    pub fn with_description(self, description: impl Into<String>) -> Self {
        self.with_extra("description", description)
    }

    /// Insert an arbitrary extra
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Display name: explicit name, else id, else ip
    pub fn name(&self) -> &str {
        self.extra
            .get("name")
            .map(String::as_str)
            .or(self.id.as_deref())
            .unwrap_or(&self.ip)
    }

    /// The `description` extra, if set
    pub fn description(&self) -> Option<&str> {
        self.extra.get("description").map(String::as_str)
    }
}
