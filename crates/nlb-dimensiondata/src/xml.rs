//! Namespace-aware XML helpers
//!
//! Responses are parsed into a small owned tree so entity decoders can look up
//! children by `(namespace, local name)`. Requests are streamed through
//! quick-xml's writer.

use nlb_common::{NlbError, Result};
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::{NsReader, Writer};
use std::fmt::Display;

/// Namespace of every request document
pub const SERVER_NS: &str = "http://oec.api.opsource.net/schemas/server";
/// Namespace of API 2.x response documents
pub const TYPES_URN: &str = "urn:didata.com:api:cloud:types";
/// Namespace of the account directory (org id discovery)
pub const DIRECTORY_NS: &str = "http://oec.api.opsource.net/schemas/directory";

fn xml_error(err: impl Display) -> NlbError {
    NlbError::Xml(err.to_string())
}

/// Parsed XML element with its namespace resolved
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Element {
    pub namespace: Option<String>,
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub text: String,
    pub children: Vec<Element>,
}

impl Element {
    /// Parse a document and return its root element
    pub fn parse(xml: &str) -> Result<Element> {
        let mut reader = NsReader::from_str(xml);
        reader.trim_text(true);

        let mut stack: Vec<Element> = Vec::new();
        loop {
            match reader.read_resolved_event().map_err(xml_error)? {
                (ns, Event::Start(start)) => stack.push(open_element(ns, &start)?),
                (ns, Event::Empty(start)) => {
                    let element = open_element(ns, &start)?;
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(element),
                        None => return Ok(element),
                    }
                }
                (_, Event::End(_)) => {
                    let element = stack
                        .pop()
                        .ok_or_else(|| NlbError::Xml("unbalanced end tag".into()))?;
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(element),
                        None => return Ok(element),
                    }
                }
                (_, Event::Text(text)) => {
                    if let Some(current) = stack.last_mut() {
                        current.text.push_str(&text.unescape().map_err(xml_error)?);
                    }
                }
                (_, Event::CData(data)) => {
                    if let Some(current) = stack.last_mut() {
                        let data = data.into_inner();
                        current.text.push_str(std::str::from_utf8(&data).map_err(xml_error)?);
                    }
                }
                (_, Event::Eof) => {
                    return Err(NlbError::Xml("document has no complete root element".into()))
                }
                _ => {}
            }
        }
    }

    /// Whether this element is `{ns}name`
    pub fn is(&self, ns: &str, name: &str) -> bool {
        self.name == name && self.namespace.as_deref() == Some(ns)
    }

    /// Attribute value by local name
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Text content of this element
    pub fn text(&self) -> &str {
        &self.text
    }

    /// First direct child `{ns}name`
    pub fn find(&self, ns: &str, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.is(ns, name))
    }

    /// All direct children `{ns}name`, in document order
    pub fn find_all<'a>(
        &'a self,
        ns: &'a str,
        name: &'a str,
    ) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |c| c.is(ns, name))
    }

    /// Text of the first direct child `{ns}name`
    pub fn find_text(&self, ns: &str, name: &str) -> Option<&str> {
        self.find(ns, name).map(Element::text)
    }
}

fn open_element(ns: ResolveResult<'_>, start: &BytesStart<'_>) -> Result<Element> {
    let namespace = match ns {
        ResolveResult::Bound(Namespace(uri)) => {
            Some(std::str::from_utf8(uri).map_err(xml_error)?.to_string())
        }
        _ => None,
    };
    let name = std::str::from_utf8(start.local_name().into_inner())
        .map_err(xml_error)?
        .to_string();

    let mut attributes = Vec::new();
    for attr in start.attributes() {
        let attr = attr.map_err(xml_error)?;
        if attr.key.as_namespace_binding().is_some() {
            continue;
        }
        let key = std::str::from_utf8(attr.key.local_name().into_inner())
            .map_err(xml_error)?
            .to_string();
        let value = attr.unescape_value().map_err(xml_error)?.into_owned();
        attributes.push((key, value));
    }

    Ok(Element {
        namespace,
        name,
        attributes,
        ..Default::default()
    })
}

/// Streams a request document rooted at a [`SERVER_NS`] element
pub struct RequestWriter {
    writer: Writer<Vec<u8>>,
    root: &'static str,
}

impl RequestWriter {
    /// Open `<root xmlns=SERVER_NS ...attrs>`
    pub fn open(root: &'static str, attrs: &[(&str, &str)]) -> Result<Self> {
        let mut writer = Writer::new(Vec::new());
        writer
            .write_event(Event::Start(root_start(root, attrs)))
            .map_err(xml_error)?;
        Ok(Self { writer, root })
    }

    /// Render a childless document `<root xmlns=SERVER_NS ...attrs/>`
    pub fn empty(root: &'static str, attrs: &[(&str, &str)]) -> Result<String> {
        let mut writer = Writer::new(Vec::new());
        writer
            .write_event(Event::Empty(root_start(root, attrs)))
            .map_err(xml_error)?;
        String::from_utf8(writer.into_inner()).map_err(xml_error)
    }

    /// `<name>value</name>`
    pub fn text_element(&mut self, name: &str, value: &str) -> Result<()> {
        self.writer
            .write_event(Event::Start(BytesStart::new(name)))
            .map_err(xml_error)?;
        self.writer
            .write_event(Event::Text(BytesText::new(value)))
            .map_err(xml_error)?;
        self.writer
            .write_event(Event::End(BytesEnd::new(name)))
            .map_err(xml_error)
    }

    /// `<name>value</name>`, or `<name/>` when unset
    pub fn optional_element(&mut self, name: &str, value: Option<&str>) -> Result<()> {
        match value {
            Some(value) => self.text_element(name, value),
            None => self
                .writer
                .write_event(Event::Empty(BytesStart::new(name)))
                .map_err(xml_error),
        }
    }

    /// Close the root and return the document
    pub fn finish(mut self) -> Result<String> {
        self.writer
            .write_event(Event::End(BytesEnd::new(self.root)))
            .map_err(xml_error)?;
        String::from_utf8(self.writer.into_inner()).map_err(xml_error)
    }
}

fn root_start<'a>(root: &'a str, attrs: &[(&'a str, &'a str)]) -> BytesStart<'a> {
    let mut start = BytesStart::new(root);
    start.push_attribute(("xmlns", SERVER_NS));
    for attr in attrs {
        start.push_attribute(*attr);
    }
    start
}
