//! Transport seam between the driver and the CloudControl API

use crate::xml::Element;
use async_trait::async_trait;
use nlb_common::Result;
use std::fmt;
use std::sync::Arc;

/// HTTP method of a CloudControl call
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Get => "GET",
            Self::Post => "POST",
        })
    }
}

/// Organisation-scoped request dispatch
///
/// `path` is relative to the organisation root, e.g.
/// `networkDomainVip/poolMember?poolId=P1`. Implementations own auth,
/// org id discovery and any retry policy.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn request(&self, path: &str, method: Method, body: Option<String>) -> Result<Element>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn request(&self, path: &str, method: Method, body: Option<String>) -> Result<Element> {
        (**self).request(path, method, body).await
    }
}
