pub mod element;
pub mod parser;

pub use element::{AttrMap, Element, Node, XHTML_NS};
pub use parser::{Document, XmlError, parse_document};
