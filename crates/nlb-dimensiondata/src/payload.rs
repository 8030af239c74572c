//! Typed CloudControl request payloads
//!
//! One struct per operation. Required fields are constructor arguments,
//! optional ones are builder methods carrying the vendor defaults. Children
//! are rendered in the order the API mandates.

use crate::enums;
use crate::xml::RequestWriter;
use nlb_common::{Algorithm, NlbError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_CONNECTION_LIMIT: u32 = 25_000;
pub const DEFAULT_CONNECTION_RATE_LIMIT: u32 = 2_000;
/// Seconds
pub const DEFAULT_SLOW_RAMP_TIME: u32 = 30;

const VIP_API: &str = "networkDomainVip";

/// What a pool does with connections to a member that went down
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ServiceDownAction {
    #[default]
    None,
    Drop,
    Reselect,
}

impl ServiceDownAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::Drop => "DROP",
            Self::Reselect => "RESELECT",
        }
    }
}

impl FromStr for ServiceDownAction {
    type Err = NlbError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "NONE" => Ok(Self::None),
            "DROP" => Ok(Self::Drop),
            "RESELECT" => Ok(Self::Reselect),
            _ => Err(NlbError::InvalidInput(format!("unknown service down action: {s}"))),
        }
    }
}

/// Virtual listener type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ListenerType {
    #[default]
    Standard,
    PerformanceLayer4,
}

impl ListenerType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Standard => "STANDARD",
            Self::PerformanceLayer4 => "PERFORMANCE_LAYER_4",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SourcePortPreservation {
    #[default]
    Preserve,
    PreserveStrict,
    Change,
}

impl SourcePortPreservation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Preserve => "PRESERVE",
            Self::PreserveStrict => "PRESERVE_STRICT",
            Self::Change => "CHANGE",
        }
    }
}

/// `createNode`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateNode {
    pub network_domain_id: String,
    pub name: String,
    /// Sent as-is; the API validates the address
    pub ipv4_address: String,
    pub description: Option<String>,
    pub connection_limit: u32,
    pub connection_rate_limit: u32,
}

impl CreateNode {
    pub fn new(
        network_domain_id: impl Into<String>,
        name: impl Into<String>,
        ipv4_address: impl Into<String>,
    ) -> Self {
        Self {
            network_domain_id: network_domain_id.into(),
            name: name.into(),
            ipv4_address: ipv4_address.into(),
            description: None,
            connection_limit: DEFAULT_CONNECTION_LIMIT,
            connection_rate_limit: DEFAULT_CONNECTION_RATE_LIMIT,
        }
    }

    pub fn with_description(mut self, description: Option<impl Into<String>>) -> Self {
        self.description = description.map(Into::into);
        self
    }

    pub fn with_connection_limit(mut self, limit: u32) -> Self {
        self.connection_limit = limit;
        self
    }

    pub fn with_connection_rate_limit(mut self, limit: u32) -> Self {
        self.connection_rate_limit = limit;
        self
    }

    fn to_xml(&self) -> Result<String> {
        let mut w = RequestWriter::open("createNode", &[])?;
        w.text_element("networkDomainId", &self.network_domain_id)?;
        w.optional_element("description", self.description.as_deref())?;
        w.text_element("name", &self.name)?;
        w.text_element("ipv4Address", &self.ipv4_address)?;
        w.text_element("connectionLimit", &self.connection_limit.to_string())?;
        w.text_element("connectionRateLimit", &self.connection_rate_limit.to_string())?;
        w.finish()
    }
}

/// `createPool`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePool {
    pub network_domain_id: String,
    pub name: String,
    /// Vendor `loadBalanceMethod` code
    pub load_balance_method: String,
    pub description: Option<String>,
    pub service_down_action: ServiceDownAction,
    pub slow_ramp_time: u32,
}

impl CreatePool {
    pub fn new(
        network_domain_id: impl Into<String>,
        name: impl Into<String>,
        load_balance_method: impl Into<String>,
    ) -> Self {
        Self {
            network_domain_id: network_domain_id.into(),
            name: name.into(),
            load_balance_method: load_balance_method.into(),
            description: None,
            service_down_action: ServiceDownAction::default(),
            slow_ramp_time: DEFAULT_SLOW_RAMP_TIME,
        }
    }

    /// Pool using the vendor code of a neutral algorithm
    pub fn for_algorithm(
        network_domain_id: impl Into<String>,
        name: impl Into<String>,
        algorithm: Algorithm,
    ) -> Result<Self> {
        let code = enums::algorithm_to_code(algorithm)
            .ok_or(NlbError::UnsupportedAlgorithm(algorithm))?;
        Ok(Self::new(network_domain_id, name, code))
    }

    pub fn with_description(mut self, description: Option<impl Into<String>>) -> Self {
        self.description = description.map(Into::into);
        self
    }

    pub fn with_service_down_action(mut self, action: ServiceDownAction) -> Self {
        self.service_down_action = action;
        self
    }

    pub fn with_slow_ramp_time(mut self, seconds: u32) -> Self {
        self.slow_ramp_time = seconds;
        self
    }

    fn to_xml(&self) -> Result<String> {
        let mut w = RequestWriter::open("createPool", &[])?;
        w.text_element("networkDomainId", &self.network_domain_id)?;
        w.optional_element("description", self.description.as_deref())?;
        w.text_element("name", &self.name)?;
        w.text_element("loadBalancerMethod", &self.load_balance_method)?;
        w.text_element("serviceDownAction", self.service_down_action.as_str())?;
        w.text_element("slowRampTime", &self.slow_ramp_time.to_string())?;
        w.finish()
    }
}

/// `addPoolMember`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddPoolMember {
    pub pool_id: String,
    pub node_id: String,
    pub port: u16,
}

impl AddPoolMember {
    pub fn new(pool_id: impl Into<String>, node_id: impl Into<String>, port: u16) -> Self {
        Self {
            pool_id: pool_id.into(),
            node_id: node_id.into(),
            port,
        }
    }

    fn to_xml(&self) -> Result<String> {
        let mut w = RequestWriter::open("addPoolMember", &[])?;
        w.text_element("poolId", &self.pool_id)?;
        w.text_element("nodeId", &self.node_id)?;
        w.text_element("port", &self.port.to_string())?;
        w.finish()
    }
}

/// `createVirtualListener`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateVirtualListener {
    pub network_domain_id: String,
    pub name: String,
    pub port: u16,
    pub description: Option<String>,
    pub listener_type: ListenerType,
    pub connection_limit: u32,
    pub connection_rate_limit: u32,
    pub source_port_preservation: SourcePortPreservation,
    /// Pool serving the listener; omitted from the document when unset
    pub pool_id: Option<String>,
}

impl CreateVirtualListener {
    pub fn new(network_domain_id: impl Into<String>, name: impl Into<String>, port: u16) -> Self {
        Self {
            network_domain_id: network_domain_id.into(),
            name: name.into(),
            port,
            description: None,
            listener_type: ListenerType::default(),
            connection_limit: DEFAULT_CONNECTION_LIMIT,
            connection_rate_limit: DEFAULT_CONNECTION_RATE_LIMIT,
            source_port_preservation: SourcePortPreservation::default(),
            pool_id: None,
        }
    }

    pub fn with_description(mut self, description: Option<impl Into<String>>) -> Self {
        self.description = description.map(Into::into);
        self
    }

    pub fn with_listener_type(mut self, listener_type: ListenerType) -> Self {
        self.listener_type = listener_type;
        self
    }

    pub fn with_connection_limit(mut self, limit: u32) -> Self {
        self.connection_limit = limit;
        self
    }

    pub fn with_connection_rate_limit(mut self, limit: u32) -> Self {
        self.connection_rate_limit = limit;
        self
    }

    pub fn with_source_port_preservation(mut self, preservation: SourcePortPreservation) -> Self {
        self.source_port_preservation = preservation;
        self
    }

    pub fn with_pool(mut self, pool_id: impl Into<String>) -> Self {
        self.pool_id = Some(pool_id.into());
        self
    }

    fn to_xml(&self) -> Result<String> {
        let mut w = RequestWriter::open("createVirtualListener", &[])?;
        w.text_element("networkDomainId", &self.network_domain_id)?;
        w.optional_element("description", self.description.as_deref())?;
        w.text_element("name", &self.name)?;
        w.text_element("port", &self.port.to_string())?;
        w.text_element("type", self.listener_type.as_str())?;
        w.text_element("connectionLimit", &self.connection_limit.to_string())?;
        w.text_element("connectionRateLimit", &self.connection_rate_limit.to_string())?;
        w.text_element("sourcePortPreservation", self.source_port_preservation.as_str())?;
        if let Some(pool_id) = &self.pool_id {
            w.text_element("poolId", pool_id)?;
        }
        w.finish()
    }
}

/// Every request the driver can send
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    CreateNode(CreateNode),
    CreatePool(CreatePool),
    AddPoolMember(AddPoolMember),
    CreateVirtualListener(CreateVirtualListener),
    RemovePoolMember { id: String },
    DeleteVirtualListener { id: String },
    DeletePool { id: String },
    DeleteNode { id: String },
}

impl Request {
    /// Root element name
    pub fn element(&self) -> &'static str {
        match self {
            Self::CreateNode(_) => "createNode",
            Self::CreatePool(_) => "createPool",
            Self::AddPoolMember(_) => "addPoolMember",
            Self::CreateVirtualListener(_) => "createVirtualListener",
            Self::RemovePoolMember { .. } => "removePoolMember",
            Self::DeleteVirtualListener { .. } => "deleteVirtualListener",
            Self::DeletePool { .. } => "deletePool",
            Self::DeleteNode { .. } => "deleteNode",
        }
    }

    /// Endpoint path, relative to the organisation root
    pub fn path(&self) -> String {
        format!("{}/{}", VIP_API, self.element())
    }

    /// `info` entry holding the generated id, for create requests
    pub fn id_key(&self) -> Option<&'static str> {
        match self {
            Self::CreateNode(_) => Some("nodeId"),
            Self::CreatePool(_) => Some("poolId"),
            Self::AddPoolMember(_) => Some("poolMemberId"),
            Self::CreateVirtualListener(_) => Some("virtualListenerId"),
            _ => None,
        }
    }

    /// Serialize the request document
    pub fn to_xml(&self) -> Result<String> {
        match self {
            Self::CreateNode(r) => r.to_xml(),
            Self::CreatePool(r) => r.to_xml(),
            Self::AddPoolMember(r) => r.to_xml(),
            Self::CreateVirtualListener(r) => r.to_xml(),
            Self::RemovePoolMember { id }
            | Self::DeleteVirtualListener { id }
            | Self::DeletePool { id }
            | Self::DeleteNode { id } => RequestWriter::empty(self.element(), &[("id", id)]),
        }
    }
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.element())
    }
}

impl From<CreateNode> for Request {
    fn from(r: CreateNode) -> Self {
        Self::CreateNode(r)
    }
}

impl From<CreatePool> for Request {
    fn from(r: CreatePool) -> Self {
        Self::CreatePool(r)
    }
}

impl From<AddPoolMember> for Request {
    fn from(r: AddPoolMember) -> Self {
        Self::AddPoolMember(r)
    }
}

impl From<CreateVirtualListener> for Request {
    fn from(r: CreateVirtualListener) -> Self {
        Self::CreateVirtualListener(r)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NS: &str = r#"xmlns="http://oec.api.opsource.net/schemas/server""#;

    #[test]
    fn test_create_node_defaults() {
        let xml = Request::from(CreateNode::new("nd-1", "web-1", "10.0.0.5")).to_xml().unwrap();
        assert_eq!(
            xml,
            format!(
                "<createNode {NS}><networkDomainId>nd-1</networkDomainId><description/>\
                 <name>web-1</name><ipv4Address>10.0.0.5</ipv4Address>\
                 <connectionLimit>25000</connectionLimit>\
                 <connectionRateLimit>2000</connectionRateLimit></createNode>"
            )
        );
    }

    #[test]
    fn test_create_node_overrides() {
        let node = CreateNode::new("nd-1", "web-1", "10.0.0.5")
            .with_description(Some("frontend"))
            .with_connection_limit(100)
            .with_connection_rate_limit(10);
        let xml = node.to_xml().unwrap();
        assert!(xml.contains("<description>frontend</description>"));
        assert!(xml.contains("<connectionLimit>100</connectionLimit>"));
        assert!(xml.contains("<connectionRateLimit>10</connectionRateLimit>"));
    }

    #[test]
    fn test_create_pool_for_algorithm() {
        let pool = CreatePool::for_algorithm("nd-1", "web", Algorithm::LeastConnections).unwrap();
        assert_eq!(
            pool.to_xml().unwrap(),
            format!(
                "<createPool {NS}><networkDomainId>nd-1</networkDomainId><description/>\
                 <name>web</name><loadBalancerMethod>LEAST_CONNECTIONS</loadBalancerMethod>\
                 <serviceDownAction>NONE</serviceDownAction><slowRampTime>30</slowRampTime></createPool>"
            )
        );
    }

    #[test]
    fn test_create_pool_unsupported_algorithm() {
        let err = CreatePool::for_algorithm("nd-1", "web", Algorithm::Random).unwrap_err();
        assert!(matches!(err, NlbError::UnsupportedAlgorithm(Algorithm::Random)));
    }

    #[test]
    fn test_service_down_action_parse() {
        assert_eq!("reselect".parse::<ServiceDownAction>().unwrap(), ServiceDownAction::Reselect);
        assert!("RESTART".parse::<ServiceDownAction>().is_err());
    }

    #[test]
    fn test_add_pool_member() {
        let request = Request::from(AddPoolMember::new("p-1", "n-1", 8080));
        assert_eq!(request.path(), "networkDomainVip/addPoolMember");
        assert_eq!(request.id_key(), Some("poolMemberId"));
        assert_eq!(
            request.to_xml().unwrap(),
            format!("<addPoolMember {NS}><poolId>p-1</poolId><nodeId>n-1</nodeId><port>8080</port></addPoolMember>")
        );
    }

    #[test]
    fn test_create_virtual_listener_order() {
        let listener = CreateVirtualListener::new("nd-1", "web", 80).with_pool("p-1");
        assert_eq!(
            listener.to_xml().unwrap(),
            format!(
                "<createVirtualListener {NS}><networkDomainId>nd-1</networkDomainId><description/>\
                 <name>web</name><port>80</port><type>STANDARD</type>\
                 <connectionLimit>25000</connectionLimit><connectionRateLimit>2000</connectionRateLimit>\
                 <sourcePortPreservation>PRESERVE</sourcePortPreservation><poolId>p-1</poolId>\
                 </createVirtualListener>"
            )
        );
    }

    #[test]
    fn test_create_virtual_listener_without_pool() {
        let xml = CreateVirtualListener::new("nd-1", "web", 80)
            .with_listener_type(ListenerType::PerformanceLayer4)
            .to_xml()
            .unwrap();
        assert!(xml.contains("<type>PERFORMANCE_LAYER_4</type>"));
        assert!(!xml.contains("poolId"));
    }

    #[test]
    fn test_single_attribute_requests() {
        let remove = Request::RemovePoolMember { id: "pm-1".into() };
        assert_eq!(remove.path(), "networkDomainVip/removePoolMember");
        assert_eq!(remove.id_key(), None);
        assert_eq!(remove.to_xml().unwrap(), format!(r#"<removePoolMember {NS} id="pm-1"/>"#));

        let delete = Request::DeleteVirtualListener { id: "vl-1".into() };
        assert_eq!(delete.path(), "networkDomainVip/deleteVirtualListener");
        assert_eq!(delete.to_xml().unwrap(), format!(r#"<deleteVirtualListener {NS} id="vl-1"/>"#));
    }

    #[test]
    fn test_id_keys() {
        let listener = Request::from(CreateVirtualListener::new("nd-1", "web", 80));
        assert_eq!(listener.id_key(), Some("virtualListenerId"));
        let pool = Request::from(CreatePool::new("nd-1", "web", "ROUND_ROBIN"));
        assert_eq!(pool.id_key(), Some("poolId"));
    }
}
