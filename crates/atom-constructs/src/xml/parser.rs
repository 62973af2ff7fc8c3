use std::fmt;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use quick_xml::events::attributes::AttrError;

use super::element::{Element, Node};

/// Parse failure from the markup layer.
#[derive(Debug, thiserror::Error)]
pub enum XmlError {
    #[error("malformed XML: {0}")]
    Syntax(#[from] quick_xml::Error),
    #[error("malformed attribute: {0}")]
    Attribute(#[from] AttrError),
    #[error("unclosed element <{0}>")]
    Unclosed(String),
    #[error("unexpected closing tag </{0}>")]
    UnexpectedClose(String),
    #[error("content outside of the root element")]
    OutsideRoot,
    #[error("document contains no root element")]
    NoRoot,
}

/// A parsed XML document.
///
/// Kept distinct from a free-standing [`Element`] because constructs treat
/// document-shaped and element-shaped raw content differently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    root: Element,
}

impl Document {
    pub fn root(&self) -> &Element {
        &self.root
    }

    pub fn into_root(self) -> Element {
        self.root
    }
}

impl From<Element> for Document {
    fn from(root: Element) -> Self {
        Self { root }
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.root.fmt(f)
    }
}

/// Parse a string into an element tree rooted at a single document root.
///
/// Default-namespace (`xmlns="..."`) declarations are resolved while
/// building: each element's namespace field holds its effective namespace,
/// declared or inherited. Prefixed namespace declarations are kept as plain
/// attributes. Comments, processing instructions and doctypes are skipped;
/// CDATA sections become text nodes.
pub fn parse_document(input: &str) -> Result<Document, XmlError> {
    let mut reader = Reader::from_str(input);
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event()? {
            Event::Start(start) => {
                let element = element_from_start(&start, stack.last())?;
                stack.push(element);
            }
            Event::Empty(start) => {
                let element = element_from_start(&start, stack.last())?;
                attach(element, &mut stack, &mut root)?;
            }
            Event::End(end) => {
                let element = stack.pop().ok_or_else(|| {
                    XmlError::UnexpectedClose(
                        String::from_utf8_lossy(end.name().as_ref()).into_owned(),
                    )
                })?;
                attach(element, &mut stack, &mut root)?;
            }
            Event::Text(text) => {
                let text = text.unescape()?.into_owned();
                match stack.last_mut() {
                    Some(parent) => parent.push_text(text),
                    None if text.trim().is_empty() => {}
                    None => return Err(XmlError::OutsideRoot),
                }
            }
            Event::CData(cdata) => {
                let text = String::from_utf8_lossy(&cdata.into_inner()).into_owned();
                match stack.last_mut() {
                    Some(parent) => parent.push_text(text),
                    None => return Err(XmlError::OutsideRoot),
                }
            }
            Event::Decl(_) | Event::PI(_) | Event::Comment(_) | Event::DocType(_) => {}
            Event::Eof => break,
        }
    }

    if let Some(open) = stack.pop() {
        return Err(XmlError::Unclosed(open.name().to_string()));
    }
    root.map(Document::from).ok_or(XmlError::NoRoot)
}

fn element_from_start(
    start: &BytesStart<'_>,
    parent: Option<&Element>,
) -> Result<Element, XmlError> {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut element = Element::new(name);

    let mut declared_ns = None;
    for attr in start.attributes() {
        let attr = attr?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value()?.into_owned();
        if key == "xmlns" {
            declared_ns = Some(value);
        } else {
            element.set_attribute(key, value);
        }
    }

    if let Some(ns) =
        declared_ns.or_else(|| parent.and_then(|p| p.namespace()).map(str::to_string))
    {
        element.set_namespace(ns);
    }
    Ok(element)
}

fn attach(
    element: Element,
    stack: &mut Vec<Element>,
    root: &mut Option<Element>,
) -> Result<(), XmlError> {
    match stack.last_mut() {
        Some(parent) => parent.push(Node::Element(element)),
        None if root.is_some() => return Err(XmlError::OutsideRoot),
        None => *root = Some(element),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parses_nested_elements_and_text() {
        let doc = parse_document("<entry><title>dive into mark</title></entry>").unwrap();
        let root = doc.root();
        assert_eq!(root.name(), "entry");
        assert_eq!(root.children().len(), 1);

        let Node::Element(title) = &root.children()[0] else {
            panic!("expected an element child");
        };
        assert_eq!(title.name(), "title");
        assert_eq!(title.children(), &[Node::Text("dive into mark".into())]);
    }

    #[test]
    fn resolves_default_namespace_inheritance() {
        let doc = parse_document(r#"<a xmlns="urn:x"><b/><c xmlns="urn:y"/></a>"#).unwrap();
        let root = doc.root();
        assert_eq!(root.namespace(), Some("urn:x"));

        let children: Vec<_> = root
            .children()
            .iter()
            .map(|n| match n {
                Node::Element(e) => (e.name(), e.namespace()),
                Node::Text(_) => panic!("expected element children"),
            })
            .collect();
        assert_eq!(children, vec![("b", Some("urn:x")), ("c", Some("urn:y"))]);
    }

    #[test]
    fn keeps_attribute_order_and_unescapes_values() {
        let doc =
            parse_document(r#"<link rel="alternate" title="a &amp; b" href="http://x/"/>"#)
                .unwrap();
        let attrs: Vec<_> = doc.root().attributes().collect();
        assert_eq!(
            attrs,
            vec![
                ("rel", "alternate"),
                ("title", "a & b"),
                ("href", "http://x/"),
            ]
        );
    }

    #[test]
    fn round_trips_escaped_entities() {
        let input = "<p>a &amp; b</p>";
        let doc = parse_document(input).unwrap();
        assert_eq!(doc.root().children(), &[Node::Text("a & b".into())]);
        assert_eq!(doc.to_string(), input);
    }

    #[test]
    fn cdata_becomes_a_text_node() {
        let doc = parse_document("<p><![CDATA[a < b]]></p>").unwrap();
        assert_eq!(doc.root().children(), &[Node::Text("a < b".into())]);
    }

    #[test]
    fn rejects_unbalanced_markup() {
        assert!(parse_document("<span>").is_err());
        assert!(parse_document("<a><b></a>").is_err());
    }

    #[test]
    fn rejects_multiple_roots_and_stray_text() {
        assert!(matches!(
            parse_document("<a/><b/>"),
            Err(XmlError::OutsideRoot)
        ));
        assert!(matches!(
            parse_document("stray<a/>"),
            Err(XmlError::OutsideRoot)
        ));
    }

    #[test]
    fn empty_input_has_no_root() {
        assert!(matches!(parse_document(""), Err(XmlError::NoRoot)));
        assert!(matches!(parse_document("  "), Err(XmlError::NoRoot)));
    }
}
