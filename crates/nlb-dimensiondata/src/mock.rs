//! Recording transport for driver tests

use crate::transport::{Method, Transport};
use crate::xml::Element;
use async_trait::async_trait;
use nlb_common::{NlbError, Result};
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordedCall {
    pub method: Method,
    pub path: String,
    pub body: Option<String>,
}

#[derive(Clone, Debug)]
enum Reply {
    Xml(String),
    ApiError(String),
}

/// Replays canned documents per `(method, path)` and records every call.
///
/// A route with several replies hands them out in order and repeats the last.
#[derive(Default)]
pub struct RecordingTransport {
    routes: Mutex<HashMap<(Method, String), VecDeque<Reply>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(self, method: Method, path: &str, xml: impl Into<String>) -> Self {
        self.push(method, path, Reply::Xml(xml.into()));
        self
    }

    /// Answer a create call with an `info` entry
    pub fn on_create(self, element: &str, key: &str, id: &str) -> Self {
        self.on(Method::Post, &format!("networkDomainVip/{element}"), info_response(&[(key, id)]))
    }

    pub fn fail(self, method: Method, path: &str, code: &str) -> Self {
        self.push(method, path, Reply::ApiError(code.to_string()));
        self
    }

    fn push(&self, method: Method, path: &str, reply: Reply) {
        self.routes
            .lock()
            .entry((method, path.to_string()))
            .or_default()
            .push_back(reply);
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }

    /// `METHOD path` of every call, in order
    pub fn call_log(&self) -> Vec<String> {
        self.calls
            .lock()
            .iter()
            .map(|c| format!("{} {}", c.method, c.path))
            .collect()
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn request(&self, path: &str, method: Method, body: Option<String>) -> Result<Element> {
        self.calls.lock().push(RecordedCall {
            method,
            path: path.to_string(),
            body,
        });

        let reply = {
            let mut routes = self.routes.lock();
            let queue = routes
                .get_mut(&(method, path.to_string()))
                .ok_or_else(|| NlbError::Api {
                    code: "RESOURCE_NOT_FOUND".into(),
                    message: format!("no route for {method} {path}"),
                })?;
            if queue.len() > 1 {
                queue.pop_front()
            } else {
                queue.front().cloned()
            }
        };

        match reply {
            Some(Reply::Xml(xml)) => Element::parse(&xml),
            Some(Reply::ApiError(code)) => Err(NlbError::Api {
                code,
                message: format!("{method} {path} rejected"),
            }),
            None => Err(NlbError::Transport("empty route".into())),
        }
    }
}

pub fn info_response(entries: &[(&str, &str)]) -> String {
    let infos: String = entries
        .iter()
        .map(|(name, value)| format!(r#"<info name="{name}" value="{value}"/>"#))
        .collect();
    format!(
        r#"<response xmlns="urn:didata.com:api:cloud:types" requestId="req-1">
             <responseCode>IN_PROGRESS</responseCode>
             <message>Request accepted.</message>
             {infos}
           </response>"#
    )
}
