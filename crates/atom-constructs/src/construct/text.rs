use serde::{Deserialize, Serialize};

use super::{Construct, ConstructPolicy, Content, Payload};

/// The three content types an Atom text construct accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextType {
    Text,
    Html,
    Xhtml,
}

impl TextType {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "text" => Some(TextType::Text),
            "html" => Some(TextType::Html),
            "xhtml" => Some(TextType::Xhtml),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TextType::Text => "text",
            TextType::Html => "html",
            TextType::Xhtml => "xhtml",
        }
    }
}

/// Policy of the plain Atom text construct: the `type` attribute accepts
/// exactly `text`, `html` and `xhtml`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TextPolicy;

impl ConstructPolicy for TextPolicy {
    const HONORS_SRC: bool = false;

    fn is_valid_type(value: &str) -> bool {
        TextType::parse(value).is_some()
    }

    fn convert_content(declared: Option<&str>, content: &Content) -> Option<Payload> {
        match declared.map(TextType::parse) {
            Some(Some(TextType::Xhtml)) => match content {
                Content::Xhtml(div) => Some(Payload::Node(div.clone())),
                Content::Value(_) => None,
            },
            // text and html both travel as character data; the element
            // writer escapes on output
            Some(Some(TextType::Text | TextType::Html)) | None => {
                Some(Payload::Text(content.to_raw_string()))
            }
            Some(None) => None,
        }
    }
}

/// An Atom text construct (`atom:title`, `atom:summary`, `atom:rights`, ...).
pub type TextConstruct = Construct<TextPolicy>;
