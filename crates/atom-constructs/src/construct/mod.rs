//! Atom text and content constructs.
//!
//! A construct pairs a declared content type with literal content and knows
//! how to re-emit that content as plain text, as HTML, and as XML fragments.
//! The shared engine is [`Construct`]; the two Atom flavors are
//! [`TextConstruct`] (types `text`, `html`, `xhtml`) and [`ContentConstruct`]
//! (additionally arbitrary media types and a `src` reference).

mod content;
mod error;
mod text;

pub use content::{ContentConstruct, ContentPolicy};
pub use error::ConstructError;
pub use text::{TextConstruct, TextPolicy, TextType};

use std::fmt;
use std::marker::PhantomData;

use crate::xml::{AttrMap, Document, Element, Node, XHTML_NS, parse_document};

/// A raw content value supplied at construction time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Text(String),
    Element(Element),
    Document(Document),
}

impl Default for Value {
    fn default() -> Self {
        Value::Text(String::new())
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Value::Text(text.to_string())
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Value::Text(text)
    }
}

impl From<Element> for Value {
    fn from(element: Element) -> Self {
        Value::Element(element)
    }
}

impl From<Document> for Value {
    fn from(document: Document) -> Self {
        Value::Document(document)
    }
}

impl From<Option<&str>> for Value {
    fn from(text: Option<&str>) -> Self {
        text.unwrap_or_default().into()
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(t) => f.write_str(t),
            Value::Element(e) => e.fmt(f),
            Value::Document(d) => d.fmt(f),
        }
    }
}

/// Stored content.
///
/// The `Xhtml` case only ever holds a `div`-rooted tree in the XHTML
/// namespace; it is established by [`Construct::set_attribute`] when the
/// type switches to `xhtml` and owned exclusively by the construct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    Value(Value),
    Xhtml(Element),
}

impl Content {
    /// The stringified form of whatever is stored, markup included.
    fn to_raw_string(&self) -> String {
        match self {
            Content::Value(v) => v.to_string(),
            Content::Xhtml(div) => div.to_string(),
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Content::Value(Value::Text(_)) => "string",
            Content::Value(Value::Element(_)) => "element",
            Content::Value(Value::Document(_)) => "document",
            Content::Xhtml(_) => "xhtml",
        }
    }
}

/// What content conversion produced for attachment to an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// Character data; the element writer escapes it on output.
    Text(String),
    /// A node attached as a deep-copied child.
    Node(Element),
}

/// The points where [`ContentConstruct`] relaxes [`TextConstruct`] behavior:
/// which type strings are acceptable and how stored content turns into an
/// element payload.
pub trait ConstructPolicy {
    /// Whether `to_element` skips the content payload when a non-empty
    /// `src` attribute is present.
    const HONORS_SRC: bool;

    fn is_valid_type(value: &str) -> bool;

    /// Convert stored content for serialization. `None` means the content
    /// cannot be represented under the declared type.
    fn convert_content(declared: Option<&str>, content: &Content) -> Option<Payload>;
}

/// The shared construct engine.
///
/// Owns the element name, the ordered attribute set (including `type`, and
/// `src` for content constructs) and the content value. All conversion views
/// recompute from the stored form on every call; nothing is cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Construct<P: ConstructPolicy> {
    name: String,
    attrs: AttrMap,
    content: Content,
    _policy: PhantomData<P>,
}

impl<P: ConstructPolicy> Construct<P> {
    /// Create a construct holding `value`, typed `text` until told
    /// otherwise. Never fails: an absent value is an empty string.
    pub fn new(value: impl Into<Value>, name: impl Into<String>) -> Self {
        let mut attrs = AttrMap::default();
        attrs.set("type", "text");
        Self {
            name: name.into(),
            attrs,
            content: Content::Value(value.into()),
            _policy: PhantomData,
        }
    }

    /// Create a construct and declare its content type in one step.
    /// Fails like [`Construct::set_attribute`] would, aborting construction.
    pub fn with_type(
        value: impl Into<Value>,
        name: impl Into<String>,
        declared: &str,
    ) -> Result<Self, ConstructError> {
        let mut construct = Self::new(value, name);
        construct.set_attribute("type", declared)?;
        Ok(construct)
    }

    /// The local name this construct serializes as (`title`, `summary`,
    /// `content`, ...).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The declared content type.
    pub fn content_type(&self) -> Option<&str> {
        self.attrs.get("type")
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attrs.get(key)
    }

    /// Set an attribute. Keys other than `type` are stored as-is.
    ///
    /// Setting `type` validates the value against the construct's policy
    /// and, for `xhtml`, eagerly reparses the current content into its
    /// structured form. The operation is atomic: on failure neither the
    /// type nor the content changes.
    pub fn set_attribute(&mut self, key: &str, value: &str) -> Result<(), ConstructError> {
        if key == "type" {
            if !P::is_valid_type(value) {
                return Err(ConstructError::InvalidType {
                    construct: self.name.clone(),
                    value: value.to_string(),
                });
            }
            if value == "xhtml" {
                let parsed = self.parse_xhtml_content()?;
                self.content = Content::Xhtml(parsed);
            }
        }
        self.attrs.set(key, value);
        Ok(())
    }

    /// Normalize the current content into a `div`-rooted tree in the XHTML
    /// namespace. Computes the new tree without touching `self`.
    fn parse_xhtml_content(&self) -> Result<Element, ConstructError> {
        match &self.content {
            // already normalized; adopting a copy keeps this idempotent
            Content::Xhtml(div) => Ok(div.clone()),
            Content::Value(Value::Element(element)) => Ok(adopt_as_div(element)),
            Content::Value(Value::Document(document)) => Ok(adopt_as_div(document.root())),
            Content::Value(Value::Text(raw)) => {
                let wrapped = format!("<div>{raw}</div>");
                let document =
                    parse_document(&wrapped).map_err(|source| ConstructError::ContentParse {
                        content: raw.clone(),
                        source,
                    })?;
                let mut div = document.into_root();
                div.set_namespace(XHTML_NS);
                Ok(div)
            }
        }
    }

    /// The construct's value as a string.
    ///
    /// For `xhtml` content this is the serialized markup of the `div`'s
    /// children, not stripped text.
    pub fn plain_text(&self) -> String {
        match &self.content {
            Content::Xhtml(div) if self.content_type() == Some("xhtml") => div.inner_markup(),
            content => content.to_raw_string(),
        }
    }

    /// A string suitable for dropping into an HTML document.
    ///
    /// `xhtml` and `html` content is already markup and passes through;
    /// `text` content is entity-escaped. Arbitrary media types (content
    /// constructs only) have no HTML rendering and yield `None`.
    pub fn html(&self) -> Option<String> {
        match self.content_type().and_then(TextType::parse) {
            Some(TextType::Xhtml | TextType::Html) => Some(self.plain_text()),
            Some(TextType::Text) => {
                Some(html_escape::encode_text(&self.plain_text()).into_owned())
            }
            None => None,
        }
    }

    /// The content as a sequence of XML nodes, a fresh copy on every call.
    ///
    /// `xhtml` content yields the `div`'s children (possibly empty); `text`
    /// content yields a single text node. `html` content would need a
    /// structured HTML parser and fails with
    /// [`ConstructError::FragmentsUnsupported`], as do arbitrary media
    /// types.
    pub fn fragments(&self) -> Result<Vec<Node>, ConstructError> {
        let declared = self.content_type().and_then(TextType::parse);
        match (declared, &self.content) {
            (Some(TextType::Xhtml), Content::Xhtml(div)) => Ok(div.children().to_vec()),
            (Some(TextType::Text), _) => Ok(vec![Node::Text(self.plain_text())]),
            _ => Err(ConstructError::FragmentsUnsupported {
                declared: self.content_type().unwrap_or("").to_string(),
            }),
        }
    }

    /// Serialize the construct to an element.
    ///
    /// The `type` attribute is omitted when it is `text`, the implicit
    /// default. When the policy honors `src` and a non-empty `src` is set,
    /// no content payload is attached and the element carries attributes
    /// only.
    pub fn to_element(&self) -> Result<Element, ConstructError> {
        let mut element = Element::new(self.name.clone());
        for (key, value) in self.attrs.iter() {
            element.set_attribute(key, value);
        }
        if self.content_type() == Some("text") {
            element.remove_attribute("type");
        }

        let src_set = P::HONORS_SRC && self.attrs.get("src").is_some_and(|s| !s.is_empty());
        if !src_set {
            match P::convert_content(self.content_type(), &self.content) {
                Some(Payload::Text(text)) => element.push_text(text),
                Some(Payload::Node(child)) => element.push_element(child),
                None => {
                    return Err(ConstructError::UnsupportedContent {
                        element: self.name.clone(),
                        declared: self.content_type().unwrap_or("").to_string(),
                        kind: self.content.kind(),
                    });
                }
            }
        }
        Ok(element)
    }
}

impl<P: ConstructPolicy> fmt::Display for Construct<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.plain_text())
    }
}

/// Adopt an element as xhtml content: a `div` in the XHTML namespace is
/// copied as-is, anything else is wrapped in a fresh one.
fn adopt_as_div(element: &Element) -> Element {
    if element.name() == "div" && element.namespace() == Some(XHTML_NS) {
        element.clone()
    } else {
        let mut div = Element::new("div");
        div.set_namespace(XHTML_NS);
        div.push_element(element.clone());
        div
    }
}
