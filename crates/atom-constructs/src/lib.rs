//! Text and content construct model for Atom documents.
//!
//! A text construct pairs a declared content type (`text`, `html` or
//! `xhtml`) with literal content and can re-emit it as plain text, as
//! HTML-safe text, as XML fragments, or as a serialized element. The
//! content construct variant additionally accepts arbitrary media types and
//! an out-of-line `src` reference. Everything is a plain owned value; this
//! crate does no I/O and assembles no documents.

pub mod construct;
pub mod xml;

pub use construct::{
    Construct, ConstructError, ConstructPolicy, Content, ContentConstruct, ContentPolicy,
    Payload, TextConstruct, TextPolicy, TextType, Value,
};
pub use xml::{AttrMap, Document, Element, Node, XHTML_NS, XmlError, parse_document};
