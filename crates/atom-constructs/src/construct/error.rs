use crate::xml::XmlError;

/// Failures raised by text and content constructs.
///
/// All of these surface at the point of detection; the construct performs no
/// retries and keeps no recovery policy of its own.
#[derive(Debug, thiserror::Error)]
pub enum ConstructError {
    /// The declared type failed the construct's validity check.
    #[error("atom:{construct} type '{value}' is meaningless")]
    InvalidType { construct: String, value: String },

    /// Content could not be parsed as XML while switching to `xhtml`.
    /// The construct is left untouched.
    #[error("{content:?} can't be parsed as XML")]
    ContentParse {
        content: String,
        #[source]
        source: XmlError,
    },

    /// Serialization met content whose shape can't be attached to an
    /// element. Indicates a construct invariant was broken earlier.
    #[error("atom:{element} can't contain {kind} content declared as '{declared}'")]
    UnsupportedContent {
        element: String,
        declared: String,
        kind: &'static str,
    },

    /// Fragment extraction has no implementation for this content type.
    /// `html` content would need a structured HTML parser.
    #[error("can't extract XML fragments from '{declared}' content")]
    FragmentsUnsupported { declared: String },
}
