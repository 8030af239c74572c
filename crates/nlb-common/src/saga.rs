//! Provisioning reports for multi-step workflows
//!
//! Creating a balancer or attaching a member takes several provider calls.
//! None of them are rolled back when a later one fails, so the driver hands
//! back a record of which steps ran and what they left behind.

use crate::error::NlbError;
use crate::types::Member;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Saga step status
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepStatus {
    /// The provider call succeeded
    Completed,
    /// The provider call failed and stopped the workflow
    Failed,
}

/// Saga overall status
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SagaStatus {
    /// Steps are still being recorded
    Running,
    /// Every step succeeded
    Completed,
    /// A step failed; see [`ProvisioningReport::failed_step`]
    Failed,
}

/// Kind of provider object a step created
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    /// Server pool
    Pool,
    /// Backend node
    Node,
    /// Node attached to a pool on a port
    PoolMember,
    /// Listener fronting a pool
    VirtualListener,
}

/// Provider object left behind by a completed step
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvisionedResource {
    /// What was created
    pub kind: ResourceKind,
    /// Provider id
    pub id: String,
}

impl ProvisionedResource {
    /// Build a resource record
    pub fn new(kind: ResourceKind, id: impl Into<String>) -> Self {
        Self { kind, id: id.into() }
    }
}

/// Saga step record
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SagaStep {
    /// Step name, e.g. `create_pool`
    pub name: String,
    /// Outcome
    pub status: StepStatus,
    /// Resource the step created, if any
    pub resource: Option<ProvisionedResource>,
    /// Error text of a failed step
    pub error: Option<String>,
    /// When the step finished
    pub completed_at: DateTime<Utc>,
}

/// Saga execution record
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProvisioningReport {
    /// Random report id, used to correlate log lines
    pub id: String,
    /// Driver operation that produced the report
    pub operation: String,
    /// Overall status
    pub status: SagaStatus,
    /// Steps in execution order
    pub steps: Vec<SagaStep>,
    /// Member produced by an attach, once every step completed
    pub member: Option<Member>,
    /// When the report was opened
    pub started_at: DateTime<Utc>,
    /// Set once the workflow completes or fails
    pub completed_at: Option<DateTime<Utc>>,
}

impl ProvisioningReport {
    /// Open a running report for `operation`
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            operation: operation.into(),
            status: SagaStatus::Running,
            steps: vec![],
            member: None,
            started_at: Utc::now(),
            completed_at: None,
        }
    }

    /// Record a step that succeeded, optionally leaving a resource behind
    pub fn step_completed(
        &mut self,
        name: impl Into<String>,
        resource: Option<ProvisionedResource>,
    ) {
        self.steps.push(SagaStep {
            name: name.into(),
            status: StepStatus::Completed,
            resource,
            error: None,
            completed_at: Utc::now(),
        });
    }

    /// Record the step that stopped the workflow. Earlier steps stay provisioned.
    pub fn step_failed(&mut self, name: impl Into<String>, error: &NlbError) {
        let name = name.into();
        tracing::warn!(
            saga = %self.id,
            operation = %self.operation,
            step = %name,
            orphaned = self.provisioned().len(),
            "Provisioning step failed: {}",
            error
        );
        self.steps.push(SagaStep {
            name,
            status: StepStatus::Failed,
            resource: None,
            error: Some(error.to_string()),
            completed_at: Utc::now(),
        });
        self.status = SagaStatus::Failed;
        self.completed_at = Some(Utc::now());
    }

    /// Mark the workflow done
    pub fn complete(&mut self) {
        self.status = SagaStatus::Completed;
        self.completed_at = Some(Utc::now());
    }

    /// Whether every step succeeded
    pub fn is_complete(&self) -> bool {
        self.status == SagaStatus::Completed
    }

    /// The step that stopped the workflow
    pub fn failed_step(&self) -> Option<&SagaStep> {
        self.steps.iter().find(|s| s.status == StepStatus::Failed)
    }

    /// Resources created so far, newest first (the order to delete them in)
    pub fn provisioned(&self) -> Vec<&ProvisionedResource> {
        self.steps
            .iter()
            .rev()
            .filter_map(|s| s.resource.as_ref())
            .collect()
    }

    /// First resource id of the given kind
    pub fn resource_id(&self, kind: ResourceKind) -> Option<&str> {
        self.steps
            .iter()
            .filter_map(|s| s.resource.as_ref())
            .find(|r| r.kind == kind)
            .map(|r| r.id.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_new() {
        let report = ProvisioningReport::new("create_balancer");
        assert_eq!(report.status, SagaStatus::Running);
        assert!(report.steps.is_empty());
        assert!(report.failed_step().is_none());
    }

    #[test]
    fn test_failed_report_keeps_resources() {
        let mut report = ProvisioningReport::new("create_balancer");
        report.step_completed(
            "create_pool",
            Some(ProvisionedResource::new(ResourceKind::Pool, "p-1")),
        );
        report.step_completed(
            "create_node",
            Some(ProvisionedResource::new(ResourceKind::Node, "n-1")),
        );
        report.step_failed(
            "create_virtual_listener",
            &NlbError::IdNotFound {
                key: "virtualListenerId".into(),
            },
        );

        assert_eq!(report.status, SagaStatus::Failed);
        assert!(!report.is_complete());
        assert_eq!(
            report.failed_step().map(|s| s.name.as_str()),
            Some("create_virtual_listener")
        );

        let ids: Vec<_> = report.provisioned().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["n-1", "p-1"]);
        assert_eq!(report.resource_id(ResourceKind::Pool), Some("p-1"));
    }
}
