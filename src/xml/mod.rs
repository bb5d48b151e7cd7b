//! Element accessor for catalog documents
//!
//! Catalog documents are parsed into a small owned element tree with
//! namespace URIs resolved at parse time. Lookups use short prefixed paths
//! (`saw:criteria/saw:columns/saw:column`, `.//saw:cvCell`,
//! `saw:view[@xsi:type="saw:compoundView"]`) against the fixed catalog
//! prefixes, so a document may bind any prefix it likes.
//!
//! Every accessor is total: a missing node, attribute or path yields an
//! empty result rather than an error.

mod path;

pub use path::ElementPath;

use quick_xml::NsReader;
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::ResolveResult;
use serde_json::{Map, Value};

/// Report namespace (`saw`)
pub const NS_SAW: &str = "com.siebel.analytics.web/report/v1.1";
/// Expression namespace (`sawx`)
pub const NS_SAWX: &str = "com.siebel.analytics.web/expression/v1.1";
/// Dashboard namespace (`sawd`)
pub const NS_SAWD: &str = "com.siebel.analytics.web/dashboard/v1.1";
/// XML Schema instance namespace (`xsi`)
pub const NS_XSI: &str = "http://www.w3.org/2001/XMLSchema-instance";
/// XML Schema namespace (`xsd`)
pub const NS_XSD: &str = "http://www.w3.org/2001/XMLSchema";

/// Map a catalog prefix to its namespace URI.
pub fn namespace_for_prefix(prefix: &str) -> Option<&'static str> {
    match prefix {
        "saw" => Some(NS_SAW),
        "sawx" => Some(NS_SAWX),
        "sawd" => Some(NS_SAWD),
        "xsi" => Some(NS_XSI),
        "xsd" => Some(NS_XSD),
        _ => None,
    }
}

/// Error raised when a document is not well-formed
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum XmlError {
    #[error("Malformed XML: {0}")]
    Malformed(String),
    #[error("Document has no root element")]
    Empty,
}

/// Attribute with its resolved namespace
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub namespace: Option<String>,
    pub name: String,
    pub value: String,
}

/// Node in the element tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
}

/// Element with resolved namespace, attributes in document order and mixed content
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub namespace: Option<String>,
    pub name: String,
    pub attributes: Vec<Attribute>,
    pub children: Vec<Node>,
}

impl Element {
    /// Check namespace URI and local name.
    pub fn is(&self, namespace: &str, local: &str) -> bool {
        self.name == local && self.namespace.as_deref() == Some(namespace)
    }

    /// Child elements in document order.
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(element) => Some(element),
            Node::Text(_) => None,
        })
    }

    /// All descendant elements in document order, excluding `self`.
    pub fn descendants(&self) -> Vec<&Element> {
        let mut out = Vec::new();
        self.collect_descendants(&mut out);
        out
    }

    fn collect_descendants<'a>(&'a self, out: &mut Vec<&'a Element>) {
        for child in self.child_elements() {
            out.push(child);
            child.collect_descendants(out);
        }
    }

    /// First element matching `path`.
    pub fn find(&self, path: &str) -> Option<&Element> {
        ElementPath::parse(path)?.select(self).into_iter().next()
    }

    /// All elements matching `path`, possibly empty.
    pub fn find_all(&self, path: &str) -> Vec<&Element> {
        ElementPath::parse(path)
            .map(|path| path.select(self))
            .unwrap_or_default()
    }

    /// Attribute value by possibly prefixed name (`name`, `xsi:type`).
    pub fn attribute(&self, name: &str) -> Option<&str> {
        let (namespace, local) = match name.split_once(':') {
            Some((prefix, local)) => (Some(namespace_for_prefix(prefix)?), local),
            None => (None, name),
        };
        self.attributes
            .iter()
            .find(|attr| attr.name == local && attr.namespace.as_deref() == namespace)
            .map(|attr| attr.value.as_str())
    }

    /// Attribute value, empty when absent.
    pub fn attr(&self, name: &str) -> String {
        self.attribute(name).unwrap_or_default().to_string()
    }

    /// All descendant text concatenated with whitespace collapsed.
    pub fn text(&self) -> String {
        let mut raw = String::new();
        self.collect_text(&mut raw);
        collapse_whitespace(&raw)
    }

    fn collect_text(&self, out: &mut String) {
        for node in &self.children {
            match node {
                Node::Text(text) => out.push_str(text),
                Node::Element(element) => element.collect_text(out),
            }
        }
    }

    /// Text appearing before the first child element, trimmed.
    pub fn leading_text(&self) -> String {
        let mut raw = String::new();
        for node in &self.children {
            match node {
                Node::Text(text) => raw.push_str(text),
                Node::Element(_) => break,
            }
        }
        raw.trim().to_string()
    }

    /// `xsi:type` with the catalog prefix removed (`saw:tableView` -> `tableView`).
    pub fn local_type(&self) -> String {
        strip_type_prefix(self.attribute("xsi:type").unwrap_or_default()).to_string()
    }

    /// Attributes keyed by local name, skipping the names in `exclude`.
    pub fn attribute_map(&self, exclude: &[&str]) -> Map<String, Value> {
        self.attributes
            .iter()
            .filter(|attr| !exclude.contains(&attr.name.as_str()))
            .map(|attr| (attr.name.clone(), Value::String(attr.value.clone())))
            .collect()
    }
}

/// Parsed catalog document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub root: Element,
}

impl Document {
    /// Parse a document, failing only when it is not well-formed.
    pub fn parse(xml: &str) -> Result<Self, XmlError> {
        let mut reader = NsReader::from_str(xml);
        reader.config_mut().trim_text(false);

        let mut stack: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;

        loop {
            let (namespace, event) = match reader.read_resolved_event() {
                Ok((resolved, event)) => (owned_namespace(resolved), event),
                Err(e) => return Err(XmlError::Malformed(e.to_string())),
            };

            match event {
                Event::Start(start) => {
                    let element = open_element(&reader, &start, namespace)?;
                    stack.push(element);
                }
                Event::Empty(start) => {
                    let element = open_element(&reader, &start, namespace)?;
                    attach(&mut stack, &mut root, element)?;
                }
                Event::End(_) => {
                    let element = stack.pop().ok_or_else(|| {
                        XmlError::Malformed("closing tag without matching opening tag".into())
                    })?;
                    attach(&mut stack, &mut root, element)?;
                }
                Event::Text(text) => {
                    if let Some(parent) = stack.last_mut() {
                        let text = text
                            .unescape()
                            .map_err(|e| XmlError::Malformed(e.to_string()))?;
                        parent.children.push(Node::Text(text.into_owned()));
                    }
                }
                Event::CData(data) => {
                    if let Some(parent) = stack.last_mut() {
                        let text = String::from_utf8_lossy(&data.into_inner()).into_owned();
                        parent.children.push(Node::Text(text));
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if let Some(open) = stack.last() {
            return Err(XmlError::Malformed(format!(
                "unexpected end of document inside <{}>",
                open.name
            )));
        }
        root.map(|root| Document { root }).ok_or(XmlError::Empty)
    }
}

fn owned_namespace(resolved: ResolveResult<'_>) -> Option<String> {
    match resolved {
        ResolveResult::Bound(ns) => Some(String::from_utf8_lossy(ns.as_ref()).into_owned()),
        _ => None,
    }
}

fn open_element(
    reader: &NsReader<&[u8]>,
    start: &BytesStart<'_>,
    namespace: Option<String>,
) -> Result<Element, XmlError> {
    let mut attributes = Vec::new();
    for attr in start.attributes() {
        let attr = attr.map_err(|e| XmlError::Malformed(e.to_string()))?;
        if attr.key.as_namespace_binding().is_some() {
            continue;
        }
        let (resolved, local) = reader.resolve_attribute(attr.key);
        let value = attr
            .unescape_value()
            .map_err(|e| XmlError::Malformed(e.to_string()))?;
        attributes.push(Attribute {
            namespace: owned_namespace(resolved),
            name: String::from_utf8_lossy(local.as_ref()).into_owned(),
            value: value.into_owned(),
        });
    }

    Ok(Element {
        namespace,
        name: String::from_utf8_lossy(start.local_name().as_ref()).into_owned(),
        attributes,
        children: Vec::new(),
    })
}

fn attach(
    stack: &mut [Element],
    root: &mut Option<Element>,
    element: Element,
) -> Result<(), XmlError> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(Node::Element(element));
        Ok(())
    } else if root.is_none() {
        *root = Some(element);
        Ok(())
    } else {
        Err(XmlError::Malformed("multiple root elements".into()))
    }
}

/// Collapse runs of whitespace to single spaces and trim.
pub fn collapse_whitespace(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Remove a catalog prefix from an `xsi:type` value.
pub fn strip_type_prefix(value: &str) -> &str {
    ["sawx:", "sawd:", "saw:"]
        .iter()
        .find_map(|prefix| value.strip_prefix(prefix))
        .unwrap_or(value)
}

/// Text of an optional node, empty when absent.
pub fn text(node: Option<&Element>) -> String {
    node.map(Element::text).unwrap_or_default()
}

/// Attribute of an optional node, empty when absent.
pub fn attr(node: Option<&Element>, name: &str) -> String {
    attr_or(node, name, "")
}

/// Attribute of an optional node with a default.
pub fn attr_or(node: Option<&Element>, name: &str, default: &str) -> String {
    node.and_then(|node| node.attribute(name))
        .unwrap_or(default)
        .to_string()
}
