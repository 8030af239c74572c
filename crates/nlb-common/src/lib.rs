//! NLB Common - Vendor-neutral load balancer abstraction
//!
//! This crate provides the surface every provider driver speaks:
//! - Entities (`LoadBalancer`, `Member`)
//! - Enumerations (`Algorithm`, `State`, `Provider`)
//! - The async [`Driver`] trait
//! - Provisioning reports for multi-step workflows
//! - Error handling
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                       Caller / nlbctl                        │
//! └──────────────────────────────┬───────────────────────────────┘
//!                                │  Driver trait
//!                                ▼
//! ┌──────────────────────────────────────────────────────────────┐
//! │  Provider driver (e.g. nlb-dimensiondata)                    │
//! │  ┌────────────┐ ┌────────────┐ ┌────────────┐ ┌───────────┐  │
//! │  │   Enum     │ │  Payload   │ │  Response  │ │ Transport │  │
//! │  │ Translator │ │  Builder   │ │   Parser   │ │           │  │
//! │  └────────────┘ └────────────┘ └────────────┘ └───────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod driver;
pub mod error;
pub mod saga;
pub mod types;

pub use driver::Driver;
pub use error::*;
pub use saga::{
    ProvisionedResource, ProvisioningReport, ResourceKind, SagaStatus, SagaStep, StepStatus,
};
pub use types::*;
