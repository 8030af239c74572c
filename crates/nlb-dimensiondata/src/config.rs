//! Driver configuration

use crate::region::{self, Region, DEFAULT_REGION};
use nlb_common::{NlbError, Result};
use serde::{Deserialize, Serialize};

/// CloudControl driver configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    /// API user name
    pub user: String,
    /// API password
    #[serde(skip_serializing)]
    pub password: String,
    /// Region key, e.g. `dd-na`
    pub region: String,
    /// Overrides the region host (`https://` is assumed when no scheme is given)
    pub host: Option<String>,
    /// Network domain new pools, nodes and listeners are created in
    pub network_domain_id: Option<String>,
    /// CloudControl API version used for `caas` calls
    pub api_version: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            user: String::new(),
            password: String::new(),
            region: DEFAULT_REGION.to_string(),
            host: None,
            network_domain_id: None,
            api_version: "2.1".to_string(),
            timeout_secs: 60,
        }
    }
}

impl DriverConfig {
    pub fn new(user: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            password: password.into(),
            ..Default::default()
        }
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    pub fn with_network_domain(mut self, network_domain_id: impl Into<String>) -> Self {
        self.network_domain_id = Some(network_domain_id.into());
        self
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Check the configuration and resolve its region
    pub fn validate(&self) -> Result<&'static Region> {
        let region = region::lookup(&self.region)?;
        if self.user.is_empty() {
            return Err(NlbError::Config("user is required".to_string()));
        }
        if self.timeout_secs == 0 {
            return Err(NlbError::Config("timeout must be > 0".to_string()));
        }
        Ok(region)
    }

    /// Base URL of the API, without a trailing slash
    pub fn base_url(&self, region: &Region) -> String {
        let host = self.host.as_deref().unwrap_or(region.host);
        let base = if host.contains("://") {
            host.to_string()
        } else {
            format!("https://{host}")
        };
        base.trim_end_matches('/').to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DriverConfig::new("admin", "secret");
        assert_eq!(config.region, "dd-na");
        assert_eq!(config.api_version, "2.1");
        let region = config.validate().unwrap();
        assert_eq!(config.base_url(region), "https://api-na.dimensiondata.com");
    }

    #[test]
    fn test_invalid_region() {
        let config = DriverConfig::new("admin", "secret").with_region("dd-moon");
        assert!(matches!(config.validate(), Err(NlbError::InvalidRegion(r)) if r == "dd-moon"));
    }

    #[test]
    fn test_missing_user() {
        let config = DriverConfig::default();
        assert!(matches!(config.validate(), Err(NlbError::Config(_))));
    }

    #[test]
    fn test_host_override() {
        let config = DriverConfig::new("admin", "secret").with_host("http://127.0.0.1:8080/");
        let region = config.validate().unwrap();
        assert_eq!(config.base_url(region), "http://127.0.0.1:8080");
    }

    #[test]
    fn test_password_not_serialized() {
        let config = DriverConfig::new("admin", "secret");
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("secret"));
    }
}
