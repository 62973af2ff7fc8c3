use std::fmt;

use quick_xml::escape::{escape, partial_escape};

/// The fixed namespace URI for embedded XHTML fragments.
pub const XHTML_NS: &str = "http://www.w3.org/1999/xhtml";

/// An ordered attribute map.
///
/// Insertion order is preserved for serialization; updating an existing key
/// keeps its position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttrMap {
    entries: Vec<(String, String)>,
}

impl AttrMap {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        let idx = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(idx).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A child of an element.
///
/// Text nodes hold unescaped character data; entity escaping happens exactly
/// once, in the writer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
}

/// A named, namespaced, attribute-bearing XML element owning its children.
///
/// `namespace` is the element's effective default namespace. An element
/// without a namespace of its own inherits its parent's; the writer emits an
/// `xmlns` declaration only where the effective namespace changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    name: String,
    namespace: Option<String>,
    attrs: AttrMap,
    children: Vec<Node>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: None,
            attrs: AttrMap::default(),
            children: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    pub fn set_namespace(&mut self, namespace: impl Into<String>) {
        self.namespace = Some(namespace.into());
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attrs.get(key)
    }

    pub fn set_attribute(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.attrs.set(key, value);
    }

    pub fn remove_attribute(&mut self, key: &str) -> Option<String> {
        self.attrs.remove(key)
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attrs.iter()
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn push(&mut self, node: Node) {
        self.children.push(node);
    }

    pub fn push_element(&mut self, element: Element) {
        self.children.push(Node::Element(element));
    }

    pub fn push_text(&mut self, text: impl Into<String>) {
        self.children.push(Node::Text(text.into()));
    }

    /// The serialized markup of this element's children, concatenated.
    ///
    /// Children are written with this element's namespace as their inherited
    /// context, so none of them sprout an `xmlns` declaration they would not
    /// have carried inside the element.
    pub fn inner_markup(&self) -> String {
        struct Inner<'a>(&'a Element);

        impl fmt::Display for Inner<'_> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                let inherited = self.0.namespace.as_deref();
                for child in &self.0.children {
                    match child {
                        Node::Element(e) => e.write(f, inherited)?,
                        Node::Text(t) => write!(f, "{}", partial_escape(t))?,
                    }
                }
                Ok(())
            }
        }

        Inner(self).to_string()
    }

    fn write(&self, f: &mut fmt::Formatter<'_>, inherited: Option<&str>) -> fmt::Result {
        write!(f, "<{}", self.name)?;
        if let Some(ns) = self.namespace.as_deref()
            && inherited != Some(ns)
        {
            write!(f, " xmlns=\"{}\"", escape(ns))?;
        }
        for (key, value) in self.attrs.iter() {
            write!(f, " {}=\"{}\"", key, escape(value))?;
        }
        if self.children.is_empty() {
            return write!(f, "/>");
        }
        write!(f, ">")?;
        let effective = self.namespace.as_deref().or(inherited);
        for child in &self.children {
            match child {
                Node::Element(e) => e.write(f, effective)?,
                Node::Text(t) => write!(f, "{}", partial_escape(t))?,
            }
        }
        write!(f, "</{}>", self.name)
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write(f, None)
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Element(e) => e.fmt(f),
            Node::Text(t) => write!(f, "{}", partial_escape(t)),
        }
    }
}
