//! Load balancer driver trait

use crate::error::Result;
use crate::saga::ProvisioningReport;
use crate::types::{Algorithm, LoadBalancer, Member, Provider};
use async_trait::async_trait;

/// Vendor-neutral load balancer management surface
#[async_trait]
pub trait Driver: Send + Sync {
    /// Provider this driver talks to
    fn provider(&self) -> Provider;

    /// Protocols accepted by `create_balancer`
    fn list_protocols(&self) -> Vec<&'static str>;

    /// Create a balancer listening on `port` and fronting `members`.
    ///
    /// Configuration problems come back as `Err`; a provider call failing
    /// part way through comes back as a failed report.
    async fn create_balancer(
        &self,
        name: &str,
        port: u16,
        protocol: &str,
        algorithm: Algorithm,
        members: &[Member],
    ) -> Result<ProvisioningReport>;

    /// List all balancers
    async fn list_balancers(&self) -> Result<Vec<LoadBalancer>>;

    /// Fetch one balancer
    async fn get_balancer(&self, balancer_id: &str) -> Result<LoadBalancer>;

    /// Destroy a balancer
    async fn destroy_balancer(&self, balancer: &LoadBalancer) -> Result<()>;

    /// List members attached to a balancer
    async fn balancer_list_members(&self, balancer: &LoadBalancer) -> Result<Vec<Member>>;

    /// Attach a member; the report carries the member once attached
    async fn balancer_attach_member(
        &self,
        balancer: &LoadBalancer,
        member: &Member,
    ) -> Result<ProvisioningReport>;

    /// Detach a member
    async fn balancer_detach_member(&self, balancer: &LoadBalancer, member: &Member) -> Result<()>;
}
