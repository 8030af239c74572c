//! CloudControl HTTP connection
//!
//! Speaks the `caas/<version>/<org id>/...` API over HTTPS with basic auth.
//! The organisation id is discovered once from the account directory and
//! cached for the lifetime of the connection.

use crate::config::DriverConfig;
use crate::response;
use crate::transport::{Method, Transport};
use crate::xml::{Element, DIRECTORY_NS, TYPES_URN};
use async_trait::async_trait;
use nlb_common::{NlbError, Result};
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info};

const ACCOUNT_PATH: &str = "oec/0.9/myaccount";

/// Reqwest-backed [`Transport`]
pub struct CloudControlConnection {
    client: reqwest::Client,
    base_url: String,
    api_version: String,
    user: String,
    password: String,
    /// Cached organisation id
    org_id: RwLock<Option<String>>,
}

impl CloudControlConnection {
    /// Build a connection for the configured region
    pub fn new(config: &DriverConfig) -> Result<Self> {
        let region = config.validate()?;
        let base_url = config.base_url(region);
        info!(region = region.key, %base_url, "CloudControl connection configured");

        let client = reqwest::Client::builder()
            .user_agent(concat!("nlb-rs/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| NlbError::Config(format!("HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url,
            api_version: config.api_version.clone(),
            user: config.user.clone(),
            password: config.password.clone(),
            org_id: RwLock::new(None),
        })
    }

    /// Organisation id of the authenticated account
    pub async fn org_id(&self) -> Result<String> {
        if let Some(org_id) = self.org_id.read().await.as_ref() {
            return Ok(org_id.clone());
        }

        let url = format!("{}/{}", self.base_url, ACCOUNT_PATH);
        let account = self.send(&url, Method::Get, None).await?;
        let org_id = account
            .find_text(DIRECTORY_NS, "orgId")
            .ok_or_else(|| NlbError::missing("Account", "orgId"))?
            .to_string();

        debug!(%org_id, "Discovered organisation id");
        *self.org_id.write().await = Some(org_id.clone());
        Ok(org_id)
    }

    async fn send(&self, url: &str, method: Method, body: Option<String>) -> Result<Element> {
        let builder = match method {
            Method::Get => self.client.get(url),
            Method::Post => self.client.post(url),
        };
        let mut builder = builder.basic_auth(&self.user, Some(&self.password));
        if let Some(body) = body {
            builder = builder
                .header(reqwest::header::CONTENT_TYPE, "text/xml")
                .body(body);
        }

        let resp = builder
            .send()
            .await
            .map_err(|e| NlbError::Transport(e.to_string()))?;
        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| NlbError::Transport(e.to_string()))?;

        if status.is_success() {
            return Element::parse(&text);
        }

        // error bodies are `response` documents when the API produced them
        match Element::parse(&text) {
            Ok(doc) if doc.is(TYPES_URN, "response") => Err(response::to_api_error(&doc)),
            _ => Err(NlbError::Transport(format!("HTTP {status}: {text}"))),
        }
    }
}

#[async_trait]
impl Transport for CloudControlConnection {
    async fn request(&self, path: &str, method: Method, body: Option<String>) -> Result<Element> {
        let org_id = self.org_id().await?;
        let url = format!(
            "{}/caas/{}/{}/{}",
            self.base_url,
            self.api_version,
            org_id,
            path.trim_start_matches('/')
        );
        debug!(%method, %url, "CloudControl request");
        self.send(&url, method, body).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{basic_auth, body_string, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const ACCOUNT: &str = r#"<ns3:Account xmlns:ns3="http://oec.api.opsource.net/schemas/directory">
        <ns3:userName>admin</ns3:userName>
        <ns3:orgId>org-1</ns3:orgId>
    </ns3:Account>"#;

    async fn server_with_account() -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/oec/0.9/myaccount"))
            .and(basic_auth("admin", "secret"))
            .respond_with(ResponseTemplate::new(200).set_body_string(ACCOUNT))
            .expect(1)
            .mount(&server)
            .await;
        server
    }

    fn connection(server: &MockServer) -> CloudControlConnection {
        let config = DriverConfig::new("admin", "secret").with_host(server.uri());
        CloudControlConnection::new(&config).unwrap()
    }

    #[tokio::test]
    async fn test_org_scoped_get() {
        let server = server_with_account().await;
        Mock::given(method("GET"))
            .and(path("/caas/2.1/org-1/networkDomainVip/poolMember"))
            .and(query_param("poolId", "P1"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"<poolMembers xmlns="urn:didata.com:api:cloud:types" totalCount="0"/>"#,
            ))
            .expect(2)
            .mount(&server)
            .await;

        let conn = connection(&server);
        for _ in 0..2 {
            let doc = conn
                .request("networkDomainVip/poolMember?poolId=P1", Method::Get, None)
                .await
                .unwrap();
            assert!(doc.is(TYPES_URN, "poolMembers"));
        }
        // account lookup is verified to run once when the server drops
    }

    #[tokio::test]
    async fn test_post_body() {
        let server = server_with_account().await;
        let body = r#"<deleteVirtualListener xmlns="http://oec.api.opsource.net/schemas/server" id="vl-1"/>"#;
        Mock::given(method("POST"))
            .and(path("/caas/2.1/org-1/networkDomainVip/deleteVirtualListener"))
            .and(header("content-type", "text/xml"))
            .and(body_string(body))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"<response xmlns="urn:didata.com:api:cloud:types"><responseCode>IN_PROGRESS</responseCode></response>"#,
            ))
            .expect(1)
            .mount(&server)
            .await;

        let conn = connection(&server);
        let doc = conn
            .request("networkDomainVip/deleteVirtualListener", Method::Post, Some(body.to_string()))
            .await
            .unwrap();
        assert_eq!(doc.find_text(TYPES_URN, "responseCode"), Some("IN_PROGRESS"));
    }

    #[tokio::test]
    async fn test_api_error() {
        let server = server_with_account().await;
        Mock::given(method("GET"))
            .and(path("/caas/2.1/org-1/networkDomainVip/pool/p-9"))
            .respond_with(ResponseTemplate::new(400).set_body_string(
                r#"<response xmlns="urn:didata.com:api:cloud:types">
                     <operation>GET_POOL</operation>
                     <responseCode>RESOURCE_NOT_FOUND</responseCode>
                     <message>Pool p-9 not found.</message>
                   </response>"#,
            ))
            .mount(&server)
            .await;

        let err = connection(&server)
            .request("networkDomainVip/pool/p-9", Method::Get, None)
            .await
            .unwrap_err();
        assert!(matches!(err, NlbError::Api { code, .. } if code == "RESOURCE_NOT_FOUND"));
    }

    #[tokio::test]
    async fn test_non_xml_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/oec/0.9/myaccount"))
            .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
            .mount(&server)
            .await;

        let err = connection(&server).org_id().await.unwrap_err();
        assert!(matches!(err, NlbError::Transport(msg) if msg.contains("401")));
    }

    #[test]
    fn test_invalid_region_fails_construction() {
        let config = DriverConfig::new("admin", "secret").with_region("dd-nowhere");
        assert!(matches!(
            CloudControlConnection::new(&config),
            Err(NlbError::InvalidRegion(_))
        ));
    }
}
