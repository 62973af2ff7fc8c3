use super::{Construct, ConstructPolicy, Content, Payload, TextPolicy, Value};

/// Policy of `atom:content`: any text-construct type is fine, and so is
/// anything that looks like a media type (contains a `/` — no registry
/// lookup, shape only).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContentPolicy;

impl ConstructPolicy for ContentPolicy {
    const HONORS_SRC: bool = true;

    fn is_valid_type(value: &str) -> bool {
        TextPolicy::is_valid_type(value) || value.contains('/')
    }

    fn convert_content(declared: Option<&str>, content: &Content) -> Option<Payload> {
        TextPolicy::convert_content(declared, content).or_else(|| {
            // arbitrary media type: hand over whatever shape is stored
            Some(match content {
                Content::Value(Value::Document(document)) => {
                    Payload::Node(document.root().clone())
                }
                Content::Value(Value::Element(element)) => Payload::Node(element.clone()),
                Content::Value(Value::Text(text)) => Payload::Text(text.clone()),
                Content::Xhtml(div) => Payload::Node(div.clone()),
            })
        })
    }
}

/// An `atom:content` element: a text construct that additionally accepts
/// arbitrary media types and an optional `src` reference.
pub type ContentConstruct = Construct<ContentPolicy>;

impl Construct<ContentPolicy> {
    /// The IRI pointing at out-of-line content, if any.
    pub fn src(&self) -> Option<&str> {
        self.attribute("src")
    }

    /// Point this construct at out-of-line content.
    ///
    /// Inline content is neither cleared nor validated against `src`; a
    /// non-empty `src` simply wins at serialization time and the content
    /// payload is skipped.
    pub fn set_src(&mut self, iri: impl Into<String>) {
        self.attrs.set("src", iri.into());
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;
    use crate::construct::ConstructError;
    use crate::xml::{Element, parse_document};

    #[rstest]
    #[case("text")]
    #[case("html")]
    #[case("xhtml")]
    #[case("image/png")]
    #[case("application/xhtml+xml")]
    fn accepts_media_types_alongside_the_standard_three(#[case] declared: &str) {
        let mut content = ContentConstruct::new("payload", "content");
        content.set_attribute("type", declared).unwrap();
        assert_eq!(content.content_type(), Some(declared));
    }

    #[test]
    fn still_rejects_slashless_garbage() {
        let mut content = ContentConstruct::new("payload", "content");
        let err = content.set_attribute("type", "banana").unwrap_err();
        assert!(matches!(err, ConstructError::InvalidType { .. }));
    }

    #[test]
    fn media_typed_string_content_serializes_as_character_data() {
        let content =
            ContentConstruct::with_type("base64base64", "content", "image/png").unwrap();
        assert_eq!(
            content.to_element().unwrap().to_string(),
            "<content type=\"image/png\">base64base64</content>"
        );
    }

    #[test]
    fn media_typed_element_content_becomes_a_child_node() {
        let mut svg = Element::new("svg");
        svg.set_attribute("width", "10");
        let content = ContentConstruct::with_type(svg, "content", "image/svg+xml").unwrap();
        assert_eq!(
            content.to_element().unwrap().to_string(),
            "<content type=\"image/svg+xml\"><svg width=\"10\"/></content>"
        );
    }

    #[test]
    fn media_typed_document_content_contributes_its_root() {
        let doc = parse_document("<svg><rect/></svg>").unwrap();
        let content = ContentConstruct::with_type(doc, "content", "image/svg+xml").unwrap();
        assert_eq!(
            content.to_element().unwrap().to_string(),
            "<content type=\"image/svg+xml\"><svg><rect/></svg></content>"
        );
    }

    #[test]
    fn src_suppresses_the_content_payload() {
        let mut content = ContentConstruct::new("ignored inline content", "content");
        content.set_attribute("type", "image/png").unwrap();
        content.set_src("http://example.com/pic.png");

        let element = content.to_element().unwrap();
        assert!(element.children().is_empty());
        assert_eq!(
            element.to_string(),
            "<content type=\"image/png\" src=\"http://example.com/pic.png\"/>"
        );
    }

    #[test]
    fn empty_src_does_not_suppress_content() {
        let mut content = ContentConstruct::new("inline", "content");
        content.set_src("");
        assert_eq!(
            content.to_element().unwrap().to_string(),
            "<content src=\"\">inline</content>"
        );
    }

    #[test]
    fn behaves_as_a_text_construct_for_the_standard_types() {
        let content = ContentConstruct::with_type("<em>hi</em>", "content", "xhtml").unwrap();
        assert_eq!(content.plain_text(), "<em>hi</em>");
        assert_eq!(content.html().as_deref(), Some("<em>hi</em>"));
    }

    #[test]
    fn media_types_have_no_html_rendering() {
        let content = ContentConstruct::with_type("payload", "content", "image/png").unwrap();
        assert_eq!(content.html(), None);
    }

    #[test]
    fn media_types_have_no_fragment_view() {
        let content = ContentConstruct::with_type("payload", "content", "image/png").unwrap();
        assert!(matches!(
            content.fragments().unwrap_err(),
            ConstructError::FragmentsUnsupported { .. }
        ));
    }
}
