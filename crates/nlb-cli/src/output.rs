//! Output formatting

use clap::ValueEnum;
use colored::Colorize;
use nlb_common::{LoadBalancer, Member, SagaStep, State, StepStatus, EXTRA_POOL_ID};
use nlb_dimensiondata::Pool;
use serde::{Deserialize, Serialize};
use std::fmt;
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Yaml,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Table => "table",
            Self::Json => "json",
            Self::Yaml => "yaml",
        })
    }
}

impl OutputFormat {
    /// Render `data`, using `rows` for the table layout
    pub fn render<T, R>(
        &self,
        data: &T,
        rows: impl IntoIterator<Item = R>,
    ) -> anyhow::Result<String>
    where
        T: Serialize + ?Sized,
        R: Tabled,
    {
        Ok(match self {
            OutputFormat::Json => serde_json::to_string_pretty(data)?,
            OutputFormat::Yaml => serde_yaml::to_string(data)?,
            OutputFormat::Table => Table::new(rows).with(Style::rounded()).to_string(),
        })
    }

    pub fn print<T, R>(&self, data: &T, rows: impl IntoIterator<Item = R>) -> anyhow::Result<()>
    where
        T: Serialize + ?Sized,
        R: Tabled,
    {
        println!("{}", self.render(data, rows)?);
        Ok(())
    }
}

fn or_dash(value: Option<impl ToString>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".into())
}

fn state_cell(state: State) -> String {
    let label = state.as_str();
    match state {
        State::Running => label.green().to_string(),
        State::Pending => label.yellow().to_string(),
        State::Error => label.red().to_string(),
        State::Deleted | State::Unknown => label.dimmed().to_string(),
    }
}

#[derive(Tabled)]
pub struct BalancerRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "STATE")]
    state: String,
    #[tabled(rename = "IP")]
    ip: String,
    #[tabled(rename = "PORT")]
    port: String,
    #[tabled(rename = "POOL")]
    pool: String,
}

impl From<&LoadBalancer> for BalancerRow {
    fn from(lb: &LoadBalancer) -> Self {
        Self {
            id: lb.id.clone(),
            name: lb.name.clone(),
            state: state_cell(lb.state),
            ip: lb.ip.clone(),
            port: lb.port.map(|p| p.to_string()).unwrap_or_else(|| "any".into()),
            pool: or_dash(lb.extra.get(EXTRA_POOL_ID)),
        }
    }
}

#[derive(Tabled)]
pub struct MemberRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "IP")]
    ip: String,
    #[tabled(rename = "PORT")]
    port: String,
    #[tabled(rename = "STATUS")]
    status: String,
}

impl From<&Member> for MemberRow {
    fn from(member: &Member) -> Self {
        Self {
            id: or_dash(member.id.as_ref()),
            name: member.name().to_string(),
            ip: member.ip.clone(),
            port: or_dash(member.port),
            status: or_dash(member.extra.get("status")),
        }
    }
}

#[derive(Tabled)]
pub struct PoolRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "ALGORITHM")]
    algorithm: String,
    #[tabled(rename = "STATUS")]
    status: String,
    #[tabled(rename = "DESCRIPTION")]
    description: String,
}

impl From<&Pool> for PoolRow {
    fn from(pool: &Pool) -> Self {
        Self {
            id: pool.id.clone(),
            name: pool.name.clone(),
            algorithm: match (&pool.load_balance_method, &pool.load_balance_method_code) {
                (Some(algorithm), _) => algorithm.to_string(),
                (None, Some(code)) => code.clone(),
                (None, None) => "-".into(),
            },
            status: pool.status.clone(),
            description: or_dash(pool.description.as_ref()),
        }
    }
}

#[derive(Tabled)]
pub struct StepRow {
    #[tabled(rename = "STEP")]
    step: String,
    #[tabled(rename = "STATUS")]
    status: String,
    #[tabled(rename = "RESOURCE")]
    resource: String,
    #[tabled(rename = "ERROR")]
    error: String,
}

impl From<&SagaStep> for StepRow {
    fn from(step: &SagaStep) -> Self {
        Self {
            step: step.name.clone(),
            status: match step.status {
                StepStatus::Completed => "completed".green().to_string(),
                StepStatus::Failed => "failed".red().to_string(),
            },
            resource: or_dash(step.resource.as_ref().map(|r| format!("{:?} {}", r.kind, r.id))),
            error: or_dash(step.error.as_ref()),
        }
    }
}

#[derive(Tabled)]
pub struct ProtocolRow {
    #[tabled(rename = "PROTOCOL")]
    pub protocol: &'static str,
}
