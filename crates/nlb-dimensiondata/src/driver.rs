//! Dimension Data load balancer driver
//!
//! A neutral balancer is a virtual listener. Its pool carries the algorithm
//! and its members are pool members wrapping nodes.

use crate::config::DriverConfig;
use crate::connection::CloudControlConnection;
use crate::payload::{AddPoolMember, CreateNode, CreatePool, CreateVirtualListener, Request};
use crate::response;
use crate::transport::{Method, Transport};
use crate::xml::Element;
use crate::{Pool, PoolMember};
use async_trait::async_trait;
use nlb_common::{
    Algorithm, Driver, LoadBalancer, Member, NlbError, ProvisionedResource, ProvisioningReport,
    Provider, ResourceKind, Result, EXTRA_NETWORK_DOMAIN_ID, EXTRA_POOL_ID,
};
use tracing::{debug, info};

/// Listener protocols CloudControl accepts
pub const PROTOCOLS: [&str; 4] = ["http", "https", "tcp", "udp"];

/// `Member::extra` key holding the node behind a pool member
pub const EXTRA_NODE_ID: &str = "node_id";

/// Driver for CloudControl network domain load balancers
pub struct DimensionDataLbDriver<T = CloudControlConnection> {
    connection: T,
    network_domain_id: Option<String>,
}

impl DimensionDataLbDriver<CloudControlConnection> {
    /// Connect to the configured region
    pub fn new(config: DriverConfig) -> Result<Self> {
        let connection = CloudControlConnection::new(&config)?;
        Ok(Self::with_transport(connection, config.network_domain_id))
    }
}

impl<T: Transport> DimensionDataLbDriver<T> {
    pub fn with_transport(connection: T, network_domain_id: Option<String>) -> Self {
        Self {
            connection,
            network_domain_id,
        }
    }

    pub fn transport(&self) -> &T {
        &self.connection
    }

    fn network_domain(&self) -> Result<&str> {
        self.network_domain_id
            .as_deref()
            .ok_or_else(|| NlbError::Config("network_domain_id is required to provision".into()))
    }

    async fn submit(&self, request: Request) -> Result<Element> {
        let body = request.to_xml()?;
        info!(operation = %request, "Submitting CloudControl request");
        debug!(%body, "Request body");
        self.connection
            .request(&request.path(), Method::Post, Some(body))
            .await
    }

    /// Submit a create request and pull the generated id from the response
    async fn create(&self, request: Request) -> Result<String> {
        let key = request
            .id_key()
            .ok_or_else(|| NlbError::InvalidInput(format!("{request} does not create anything")))?;
        let doc = self.submit(request).await?;
        response::extract_id(&doc, key)
    }

    async fn get(&self, path: &str) -> Result<Element> {
        self.connection.request(path, Method::Get, None).await
    }

    // =========================================================================
    // Extensions
    // =========================================================================

    pub async fn ex_create_node(&self, node: CreateNode) -> Result<String> {
        self.create(node.into()).await
    }

    pub async fn ex_create_pool(&self, pool: CreatePool) -> Result<String> {
        self.create(pool.into()).await
    }

    pub async fn ex_create_pool_member(
        &self,
        pool_id: &str,
        node_id: &str,
        port: u16,
    ) -> Result<String> {
        self.create(AddPoolMember::new(pool_id, node_id, port).into())
            .await
    }

    pub async fn ex_create_virtual_listener(
        &self,
        listener: CreateVirtualListener,
    ) -> Result<String> {
        self.create(listener.into()).await
    }

    pub async fn ex_get_pools(&self) -> Result<Vec<Pool>> {
        response::to_pools(&self.get("networkDomainVip/pool").await?)
    }

    pub async fn ex_get_pool(&self, pool_id: &str) -> Result<Pool> {
        response::to_pool(&self.get(&format!("networkDomainVip/pool/{pool_id}")).await?)
    }

    pub async fn ex_get_pool_members(&self, pool_id: &str) -> Result<Vec<PoolMember>> {
        let doc = self
            .get(&format!("networkDomainVip/poolMember?poolId={pool_id}"))
            .await?;
        response::to_pool_members(&doc)
    }

    pub async fn ex_get_pool_member(&self, pool_member_id: &str) -> Result<PoolMember> {
        let doc = self
            .get(&format!("networkDomainVip/poolMember/{pool_member_id}"))
            .await?;
        response::to_pool_member(&doc)
    }

    /// Delete a pool left behind by a destroyed balancer
    pub async fn ex_destroy_pool(&self, pool_id: &str) -> Result<()> {
        self.submit(Request::DeletePool { id: pool_id.to_string() })
            .await?;
        Ok(())
    }

    /// Delete a node; it must no longer be a member of any pool
    pub async fn ex_destroy_node(&self, node_id: &str) -> Result<()> {
        self.submit(Request::DeleteNode { id: node_id.to_string() })
            .await?;
        Ok(())
    }

    fn to_member(balancer: &LoadBalancer, pool_member: PoolMember) -> Member {
        Member::new(pool_member.ip_address, Some(pool_member.port))
            .with_id(pool_member.id)
            .with_name(pool_member.name)
            .with_extra(EXTRA_NODE_ID, pool_member.node_id)
            .with_extra("status", pool_member.status)
            .with_balancer(&balancer.id)
    }
}

/// Record the outcome of a step; `None` means the workflow stops here
fn record(
    report: &mut ProvisioningReport,
    step: &str,
    kind: ResourceKind,
    outcome: Result<String>,
) -> Option<String> {
    match outcome {
        Ok(id) => {
            report.step_completed(step, Some(ProvisionedResource::new(kind, id.clone())));
            Some(id)
        }
        Err(e) => {
            report.step_failed(step, &e);
            None
        }
    }
}

#[async_trait]
impl<T: Transport> Driver for DimensionDataLbDriver<T> {
    fn provider(&self) -> Provider {
        Provider::DimensionData
    }

    fn list_protocols(&self) -> Vec<&'static str> {
        PROTOCOLS.to_vec()
    }

    async fn create_balancer(
        &self,
        name: &str,
        port: u16,
        protocol: &str,
        algorithm: Algorithm,
        members: &[Member],
    ) -> Result<ProvisioningReport> {
        // the listener protocol is chosen by the API from its type
        if !PROTOCOLS.contains(&protocol) {
            return Err(NlbError::UnsupportedProtocol(protocol.to_string()));
        }
        let domain = self.network_domain()?;
        let pool = CreatePool::for_algorithm(domain, name, algorithm)?;

        info!(name, port, %algorithm, members = members.len(), "Creating load balancer");
        let mut report = ProvisioningReport::new("create_balancer");

        let Some(pool_id) = record(
            &mut report,
            "create_pool",
            ResourceKind::Pool,
            self.ex_create_pool(pool).await,
        ) else {
            return Ok(report);
        };

        for member in members {
            let node = CreateNode::new(domain, member.name(), &member.ip)
                .with_description(member.description());
            let Some(node_id) = record(
                &mut report,
                "create_node",
                ResourceKind::Node,
                self.ex_create_node(node).await,
            ) else {
                return Ok(report);
            };

            if record(
                &mut report,
                "add_pool_member",
                ResourceKind::PoolMember,
                self.ex_create_pool_member(&pool_id, &node_id, port).await,
            )
            .is_none()
            {
                return Ok(report);
            }
        }

        let listener = CreateVirtualListener::new(domain, name, port).with_pool(&pool_id);
        if record(
            &mut report,
            "create_virtual_listener",
            ResourceKind::VirtualListener,
            self.ex_create_virtual_listener(listener).await,
        )
        .is_some()
        {
            report.complete();
            info!(name, saga = %report.id, "Load balancer created");
        }
        Ok(report)
    }

    async fn list_balancers(&self) -> Result<Vec<LoadBalancer>> {
        response::to_balancers(&self.get("networkDomainVip/virtualListener").await?)
    }

    async fn get_balancer(&self, balancer_id: &str) -> Result<LoadBalancer> {
        let doc = self
            .get(&format!("networkDomainVip/virtualListener/{balancer_id}"))
            .await?;
        response::to_balancer(&doc)
    }

    async fn destroy_balancer(&self, balancer: &LoadBalancer) -> Result<()> {
        info!(balancer = %balancer.id, "Destroying load balancer");
        self.submit(Request::DeleteVirtualListener { id: balancer.id.clone() })
            .await?;
        Ok(())
    }

    async fn balancer_list_members(&self, balancer: &LoadBalancer) -> Result<Vec<Member>> {
        let pool_id = balancer.extra_value(EXTRA_POOL_ID)?;
        Ok(self
            .ex_get_pool_members(pool_id)
            .await?
            .into_iter()
            .map(|pm| Self::to_member(balancer, pm))
            .collect())
    }

    async fn balancer_attach_member(
        &self,
        balancer: &LoadBalancer,
        member: &Member,
    ) -> Result<ProvisioningReport> {
        let pool_id = balancer.extra_value(EXTRA_POOL_ID)?;
        let domain = match balancer.extra.get(EXTRA_NETWORK_DOMAIN_ID) {
            Some(domain) => domain.as_str(),
            None => self.network_domain()?,
        };
        let port = member.port.or(balancer.port).ok_or_else(|| {
            NlbError::InvalidInput(format!(
                "member {} has no port and balancer {} listens on any port",
                member.ip, balancer.id
            ))
        })?;

        info!(balancer = %balancer.id, ip = %member.ip, port, "Attaching member");
        let mut report = ProvisioningReport::new("balancer_attach_member");

        let node = CreateNode::new(domain, member.name(), &member.ip)
            .with_description(member.description());
        let Some(node_id) = record(
            &mut report,
            "create_node",
            ResourceKind::Node,
            self.ex_create_node(node).await,
        ) else {
            return Ok(report);
        };

        let Some(pool_member_id) = record(
            &mut report,
            "add_pool_member",
            ResourceKind::PoolMember,
            self.ex_create_pool_member(pool_id, &node_id, port).await,
        ) else {
            return Ok(report);
        };

        let mut attached = member.clone().with_id(pool_member_id).with_balancer(&balancer.id);
        attached.port = Some(port);
        attached.extra.insert(EXTRA_NODE_ID.to_string(), node_id);
        report.member = Some(attached);
        report.complete();
        Ok(report)
    }

    async fn balancer_detach_member(&self, balancer: &LoadBalancer, member: &Member) -> Result<()> {
        let id = member.id.clone().ok_or_else(|| {
            NlbError::InvalidInput(format!("member {} has no pool member id", member.ip))
        })?;
        info!(balancer = %balancer.id, member = %id, "Detaching member");
        self.submit(Request::RemovePoolMember { id }).await?;
        Ok(())
    }
}
