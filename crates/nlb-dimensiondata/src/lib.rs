//! NLB Dimension Data driver
//!
//! Maps the neutral load balancer API onto CloudControl's network domain VIP
//! objects.
//!
//! # Object model
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  Network Domain                                              │
//! │                                                              │
//! │  ┌──────────────────┐        ┌───────────────────────────┐   │
//! │  │ Virtual Listener │───────▶│ Pool (loadBalanceMethod)  │   │
//! │  │  = LoadBalancer  │        │                           │   │
//! │  └──────────────────┘        │  ┌─────────┐ ┌─────────┐  │   │
//! │                              │  │ Pool    │ │ Pool    │  │   │
//! │                              │  │ Member  │ │ Member  │  │   │
//! │                              │  └────┬────┘ └────┬────┘  │   │
//! │                              └───────┼───────────┼───────┘   │
//! │                                      ▼           ▼           │
//! │                                 ┌────────┐  ┌────────┐       │
//! │                                 │  Node  │  │  Node  │       │
//! │                                 └────────┘  └────────┘       │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Destroying a balancer deletes the listener only. Pools, nodes and pool
//! members stay provisioned until removed through the `ex_destroy_*` calls.

use serde::{Deserialize, Serialize};

pub mod config;
pub mod connection;
pub mod driver;
pub mod enums;
pub mod payload;
pub mod region;
pub mod response;
pub mod transport;
pub mod xml;

#[cfg(test)]
mod mock;

pub use config::DriverConfig;
pub use connection::CloudControlConnection;
pub use driver::{DimensionDataLbDriver, PROTOCOLS};
pub use payload::{
    AddPoolMember, CreateNode, CreatePool, CreateVirtualListener, ListenerType, Request,
    ServiceDownAction, SourcePortPreservation,
};
pub use region::{Region, DEFAULT_REGION, REGIONS};
pub use transport::{Method, Transport};

// =============================================================================
// Core Types
// =============================================================================

/// CloudControl pool
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pool {
    pub id: String,
    pub name: String,
    /// Raw vendor state, e.g. `NORMAL` or `PENDING_ADD`
    pub status: String,
    pub description: Option<String>,
    /// `None` when the vendor method has no neutral equivalent
    pub load_balance_method: Option<nlb_common::Algorithm>,
    /// Raw vendor `loadBalanceMethod` code
    pub load_balance_method_code: Option<String>,
}

/// A node attached to a pool at a port
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolMember {
    pub id: String,
    /// Name of the node
    pub name: String,
    pub node_id: String,
    /// Raw vendor state
    pub status: String,
    /// Address of the node
    pub ip_address: String,
    pub port: u16,
}
