//! CloudControl response decoding
//!
//! Create operations answer with a `response` document whose `info` children
//! carry generated ids as name/value pairs. List and get operations answer
//! with the objects themselves.

use crate::enums;
use crate::xml::{Element, TYPES_URN};
use crate::{Pool, PoolMember};
use nlb_common::{
    LoadBalancer, NlbError, Provider, Result, State, EXTRA_NETWORK_DOMAIN_ID, EXTRA_POOL_ID,
};
use std::collections::BTreeMap;

/// Value of the `info` entry named `key`
pub fn find_info<'a>(response: &'a Element, key: &str) -> Option<&'a str> {
    response
        .find_all(TYPES_URN, "info")
        .find(|info| info.attr("name") == Some(key))
        .and_then(|info| info.attr("value"))
}

/// Generated id from a create response; missing entry is a failed create
pub fn extract_id(response: &Element, key: &str) -> Result<String> {
    find_info(response, key)
        .map(str::to_string)
        .ok_or_else(|| NlbError::IdNotFound { key: key.to_string() })
}

/// Vendor error carried by a `response` document
pub fn to_api_error(response: &Element) -> NlbError {
    NlbError::Api {
        code: response
            .find_text(TYPES_URN, "responseCode")
            .unwrap_or("UNKNOWN")
            .to_string(),
        message: response
            .find_text(TYPES_URN, "message")
            .unwrap_or_default()
            .to_string(),
    }
}

pub fn to_balancers(root: &Element) -> Result<Vec<LoadBalancer>> {
    root.find_all(TYPES_URN, "virtualListener")
        .map(to_balancer)
        .collect()
}

/// Decode a `virtualListener`
pub fn to_balancer(element: &Element) -> Result<LoadBalancer> {
    const ENTITY: &str = "virtualListener";

    let mut extra = BTreeMap::new();
    extra.insert(
        EXTRA_NETWORK_DOMAIN_ID.to_string(),
        required_text(element, ENTITY, "networkDomainId")?.to_string(),
    );
    // listeners may exist without a pool
    if let Some(pool) = element.find(TYPES_URN, "pool") {
        let pool_id = pool.attr("id").ok_or_else(|| NlbError::missing(ENTITY, "pool@id"))?;
        extra.insert(EXTRA_POOL_ID.to_string(), pool_id.to_string());
    }

    // no port means the listener accepts any port
    let port = element
        .find_text(TYPES_URN, "port")
        .map(|text| parse_port(ENTITY, text))
        .transpose()?;

    Ok(LoadBalancer {
        id: required_attr(element, ENTITY, "id")?.to_string(),
        name: required_text(element, ENTITY, "name")?.to_string(),
        state: element
            .find_text(TYPES_URN, "state")
            .map(enums::code_to_state)
            .unwrap_or(State::Unknown),
        ip: required_text(element, ENTITY, "listenerIpAddress")?.to_string(),
        port,
        provider: Provider::DimensionData,
        extra,
    })
}

pub fn to_pools(root: &Element) -> Result<Vec<Pool>> {
    root.find_all(TYPES_URN, "pool").map(to_pool).collect()
}

/// Decode a `pool`
pub fn to_pool(element: &Element) -> Result<Pool> {
    const ENTITY: &str = "pool";

    let method = element.find_text(TYPES_URN, "loadBalanceMethod");

    Ok(Pool {
        id: required_attr(element, ENTITY, "id")?.to_string(),
        name: required_text(element, ENTITY, "name")?.to_string(),
        status: required_text(element, ENTITY, "state")?.to_string(),
        description: element
            .find_text(TYPES_URN, "description")
            .filter(|d| !d.is_empty())
            .map(str::to_string),
        load_balance_method: method.and_then(enums::code_to_algorithm),
        load_balance_method_code: method.map(str::to_string),
    })
}

pub fn to_pool_members(root: &Element) -> Result<Vec<PoolMember>> {
    root.find_all(TYPES_URN, "poolMember")
        .map(to_pool_member)
        .collect()
}

/// Decode a `poolMember`. Name and address come from the nested `node`.
pub fn to_pool_member(element: &Element) -> Result<PoolMember> {
    const ENTITY: &str = "poolMember";

    let node = element
        .find(TYPES_URN, "node")
        .ok_or_else(|| NlbError::missing(ENTITY, "node"))?;

    Ok(PoolMember {
        id: required_attr(element, ENTITY, "id")?.to_string(),
        name: required_attr(node, ENTITY, "name")?.to_string(),
        node_id: required_attr(node, ENTITY, "id")?.to_string(),
        status: required_text(element, ENTITY, "state")?.to_string(),
        ip_address: required_attr(node, ENTITY, "ipAddress")?.to_string(),
        port: parse_port(ENTITY, required_text(element, ENTITY, "port")?)?,
    })
}

fn required_text<'a>(element: &'a Element, entity: &str, field: &str) -> Result<&'a str> {
    element
        .find_text(TYPES_URN, field)
        .ok_or_else(|| NlbError::missing(entity, field))
}

fn required_attr<'a>(element: &'a Element, entity: &str, name: &str) -> Result<&'a str> {
    element
        .attr(name)
        .ok_or_else(|| NlbError::missing(entity, &format!("@{name}")))
}

fn parse_port(entity: &str, text: &str) -> Result<u16> {
    text.trim()
        .parse()
        .map_err(|_| NlbError::Decode(format!("{entity}: malformed port `{text}`")))
}
