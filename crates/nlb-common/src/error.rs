//! Error types for NLB drivers

use crate::types::Algorithm;
use thiserror::Error;

/// Load balancer driver error type
#[derive(Error, Debug)]
pub enum NlbError {
    /// Unknown region supplied at construction
    #[error("invalid region: {0}")]
    InvalidRegion(String),

    /// Configuration error
    #[error("config error: {0}")]
    Config(String),

    /// A create response did not carry the expected identifier
    #[error("no `{key}` entry in response info list")]
    IdNotFound {
        /// Expected info entry name
        key: String,
    },

    /// Response entity is missing a field or carries malformed text
    #[error("decode error: {0}")]
    Decode(String),

    /// Response body is not well-formed XML
    #[error("XML error: {0}")]
    Xml(String),

    /// Vendor API rejected the request
    #[error("API error {code}: {message}")]
    Api {
        /// Vendor response code (e.g. `RESOURCE_NOT_FOUND`)
        code: String,
        /// Vendor message
        message: String,
    },

    /// HTTP transport failure
    #[error("transport error: {0}")]
    Transport(String),

    /// Algorithm has no vendor equivalent
    #[error("unsupported algorithm: {0}")]
    UnsupportedAlgorithm(Algorithm),

    /// Protocol is not in the driver's protocol list
    #[error("unsupported protocol: {0}")]
    UnsupportedProtocol(String),

    /// Balancer lacks a vendor attribute the operation needs
    #[error("balancer {balancer} has no `{key}` in extra")]
    MissingExtra {
        /// Balancer id
        balancer: String,
        /// Missing extra key
        key: &'static str,
    },

    /// Caller passed an entity that cannot be used for the operation
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl NlbError {
    /// Build a decode error for a missing child element or attribute
    pub fn missing(entity: &str, field: &str) -> Self {
        Self::Decode(format!("{entity}: missing `{field}`"))
    }

    /// Configuration errors are fatal and never worth retrying
    pub fn is_config(&self) -> bool {
        matches!(self, Self::InvalidRegion(_) | Self::Config(_))
    }
}

/// Result type for NLB drivers
pub type Result<T> = std::result::Result<T, NlbError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_message() {
        let err = NlbError::missing("poolMember", "port");
        assert_eq!(err.to_string(), "decode error: poolMember: missing `port`");
    }

    #[test]
    fn test_config_classification() {
        assert!(NlbError::InvalidRegion("dd-xx".into()).is_config());
        assert!(!NlbError::IdNotFound { key: "nodeId".into() }.is_config());
    }
}
