//! CLI Commands

pub mod balancers;
pub mod config;
pub mod members;
pub mod pools;

use crate::config::{Config, Overrides};
use crate::output::{OutputFormat, ProtocolRow, StepRow};
use nlb_common::{Member, ProvisioningReport};
use nlb_dimensiondata::{DimensionDataLbDriver, PROTOCOLS};
use std::net::Ipv4Addr;

/// Settings shared by every command that talks to the API
pub struct Context {
    profile: Option<String>,
    config: Config,
    overrides: Overrides,
    pub format: OutputFormat,
}

impl Context {
    pub fn new(
        profile: Option<&str>,
        overrides: Overrides,
        format: Option<OutputFormat>,
    ) -> anyhow::Result<Self> {
        let config = Config::load(profile)?;
        let format = format.or(config.default_format).unwrap_or_default();
        Ok(Self {
            profile: profile.map(String::from),
            config,
            overrides,
            format,
        })
    }

    pub fn profile(&self) -> Option<&str> {
        self.profile.as_deref()
    }

    pub fn driver(&self) -> anyhow::Result<DimensionDataLbDriver> {
        let config = self.config.driver_config(self.overrides.clone())?;
        tracing::debug!(
            profile = self.profile().unwrap_or("default"),
            region = %config.region,
            "Connecting"
        );
        Ok(DimensionDataLbDriver::new(config)?)
    }
}

/// Parse `ip[:port]` into a member
pub fn parse_member(s: &str) -> Result<Member, String> {
    let (ip, port) = match s.split_once(':') {
        Some((ip, port)) => {
            let port = port
                .parse::<u16>()
                .map_err(|_| format!("invalid port in `{}`", s))?;
            (ip, Some(port))
        }
        None => (s, None),
    };
    ip.parse::<Ipv4Addr>()
        .map_err(|_| format!("invalid IPv4 address in `{}`", s))?;
    Ok(Member::new(ip, port))
}

/// Print the listener protocols; needs no credentials
pub fn protocols(format: OutputFormat) -> anyhow::Result<()> {
    format.print(&PROTOCOLS, protocol_rows())
}

fn protocol_rows() -> impl Iterator<Item = ProtocolRow> {
    PROTOCOLS.iter().map(|&protocol| ProtocolRow { protocol })
}

/// Print a provisioning report; a stopped workflow becomes an error
pub fn finish_report(report: &ProvisioningReport, format: OutputFormat) -> anyhow::Result<()> {
    format.print(report, report.steps.iter().map(StepRow::from))?;
    if let Some(failed) = report.failed_step() {
        let left: Vec<String> = report
            .provisioned()
            .iter()
            .map(|r| format!("{:?} {}", r.kind, r.id))
            .collect();
        anyhow::bail!(
            "{} stopped at {}: {}; left provisioned: [{}]",
            report.operation,
            failed.name,
            failed.error.as_deref().unwrap_or("unknown error"),
            left.join(", ")
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use nlb_common::{NlbError, ProvisionedResource, ResourceKind};

    #[test]
    fn test_parse_member() {
        let member = parse_member("10.0.0.5:8080").unwrap();
        assert_eq!(member.ip, "10.0.0.5");
        assert_eq!(member.port, Some(8080));

        assert_eq!(parse_member("10.0.0.5").unwrap().port, None);
        assert!(parse_member("10.0.0.5:http").is_err());
        assert!(parse_member("web-1:80").is_err());
    }

    #[test]
    fn test_failed_report_is_error() {
        let mut report = ProvisioningReport::new("create_balancer");
        report.step_completed(
            "create_pool",
            Some(ProvisionedResource::new(ResourceKind::Pool, "P1")),
        );
        report.step_failed("create_node", &NlbError::Api {
            code: "NAME_NOT_UNIQUE".into(),
            message: "duplicate".into(),
        });

        let err = finish_report(&report, OutputFormat::Json).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("create_node"));
        assert!(msg.contains("Pool P1"));
    }

    #[test]
    fn test_protocols_without_credentials() {
        assert!(protocols(OutputFormat::Json).is_ok());

        let out = OutputFormat::Json.render(&PROTOCOLS, protocol_rows()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value, serde_json::json!(["http", "https", "tcp", "udp"]));
    }

    #[test]
    fn test_complete_report_is_ok() {
        let mut report = ProvisioningReport::new("balancer_attach_member");
        report.complete();
        assert!(finish_report(&report, OutputFormat::Yaml).is_ok());
    }
}
