//! CLI Configuration

use crate::output::OutputFormat;
use anyhow::{bail, Context as _};
use nlb_dimensiondata::{region, DriverConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Keys accepted by `config set` and `config get`
pub const KEYS: [&str; 6] = [
    "user",
    "password",
    "region",
    "network_domain_id",
    "host",
    "default_format",
];

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub user: Option<String>,
    pub password: Option<String>,
    pub region: Option<String>,
    pub network_domain_id: Option<String>,
    /// Overrides the region endpoint
    pub host: Option<String>,
    pub default_format: Option<OutputFormat>,
}

/// Values given on the command line or through `NLB_*` variables
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub user: Option<String>,
    pub password: Option<String>,
    pub region: Option<String>,
    pub network_domain_id: Option<String>,
}

impl Config {
    pub fn load(profile: Option<&str>) -> anyhow::Result<Self> {
        Self::load_from(&Self::config_path(profile)?)
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content =
            fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))
    }

    pub fn save(&self, profile: Option<&str>) -> anyhow::Result<PathBuf> {
        let path = Self::config_path(profile)?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content).with_context(|| format!("writing {}", path.display()))
    }

    pub fn config_path(profile: Option<&str>) -> anyhow::Result<PathBuf> {
        let home = dirs::home_dir().context("Cannot find home directory")?;
        let filename = match profile {
            Some(p) => format!("config.{}.toml", p),
            None => "config.toml".to_string(),
        };
        Ok(home.join(".nlb").join(filename))
    }

    pub fn set(&mut self, key: &str, value: String) -> anyhow::Result<()> {
        match key {
            "user" => self.user = Some(value),
            "password" => self.password = Some(value),
            "region" => {
                region::lookup(&value)?;
                self.region = Some(value);
            }
            "network_domain_id" => self.network_domain_id = Some(value),
            "host" => self.host = Some(value),
            "default_format" => {
                let format = <OutputFormat as clap::ValueEnum>::from_str(&value, true)
                    .map_err(|e| anyhow::anyhow!(e))?;
                self.default_format = Some(format);
            }
            _ => bail!("Unknown config key: {}", key),
        }
        Ok(())
    }

    /// Displayable value of `key`; the password is masked
    pub fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        Ok(match key {
            "user" => self.user.clone(),
            "password" => self.password.as_ref().map(|_| "****".to_string()),
            "region" => self.region.clone(),
            "network_domain_id" => self.network_domain_id.clone(),
            "host" => self.host.clone(),
            "default_format" => self.default_format.map(|f| f.to_string()),
            _ => bail!("Unknown config key: {}", key),
        })
    }

    /// Driver configuration with command-line values taking precedence
    pub fn driver_config(&self, overrides: Overrides) -> anyhow::Result<DriverConfig> {
        let user = overrides
            .user
            .or_else(|| self.user.clone())
            .context("no API user configured; pass --user, set NLB_USER or run `nlbctl config set user <name>`")?;
        let password = overrides
            .password
            .or_else(|| self.password.clone())
            .unwrap_or_default();

        let mut config = DriverConfig::new(user, password);
        if let Some(region) = overrides.region.or_else(|| self.region.clone()) {
            config = config.with_region(region);
        }
        if let Some(domain) = overrides
            .network_domain_id
            .or_else(|| self.network_domain_id.clone())
        {
            config = config.with_network_domain(domain);
        }
        if let Some(host) = &self.host {
            config = config.with_host(host);
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.set("user", "admin".into()).unwrap();
        config.set("region", "dd-eu".into()).unwrap();
        config.set("default_format", "yaml".into()).unwrap();
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.user.as_deref(), Some("admin"));
        assert_eq!(loaded.region.as_deref(), Some("dd-eu"));
        assert_eq!(loaded.default_format, Some(OutputFormat::Yaml));
    }

    #[test]
    fn test_set_rejects_unknown_region_and_key() {
        let mut config = Config::default();
        assert!(config.set("region", "dd-moon".into()).is_err());
        assert!(config.set("api_key", "x".into()).is_err());
        assert_eq!(config.region, None);
    }

    #[test]
    fn test_password_is_masked() {
        let mut config = Config::default();
        config.set("password", "hunter2".into()).unwrap();
        assert_eq!(config.get("password").unwrap().as_deref(), Some("****"));
        assert_eq!(config.get("host").unwrap(), None);
    }

    #[test]
    fn test_overrides_take_precedence() {
        let config = Config {
            user: Some("file-user".into()),
            password: Some("file-pass".into()),
            region: Some("dd-eu".into()),
            network_domain_id: Some("nd-file".into()),
            ..Default::default()
        };
        let overrides = Overrides {
            user: Some("flag-user".into()),
            network_domain_id: Some("nd-flag".into()),
            ..Default::default()
        };

        let driver = config.driver_config(overrides).unwrap();
        assert_eq!(driver.user, "flag-user");
        assert_eq!(driver.password, "file-pass");
        assert_eq!(driver.region, "dd-eu");
        assert_eq!(driver.network_domain_id.as_deref(), Some("nd-flag"));
    }

    #[test]
    fn test_user_required() {
        let err = Config::default()
            .driver_config(Overrides::default())
            .unwrap_err();
        assert!(err.to_string().contains("NLB_USER"));
    }

    #[test]
    fn test_profile_path() {
        let path = Config::config_path(Some("staging")).unwrap();
        assert!(path.ends_with(".nlb/config.staging.toml"));
    }
}
