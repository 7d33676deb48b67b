use quick_xml::events::attributes::AttrError;
use recordkit_core::FieldKind;

/// Errors that can occur while encoding or decoding records.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The input is not well-formed XML.
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// An element carries a malformed attribute.
    #[error("XML attribute error: {0}")]
    Attr(#[from] AttrError),

    /// An I/O error occurred on the underlying sink or source.
    #[error("codec I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The input has a different shape than expected at this point.
    #[error("expected {expected}, found {found}")]
    UnexpectedNode { expected: &'static str, found: String },

    /// The input ended inside an element.
    #[error("unexpected end of input")]
    UnexpectedEof,

    /// Element text could not be parsed into the field's value kind.
    #[error("invalid {kind} value {value:?} for field {field}")]
    InvalidScalar {
        field: String,
        value: String,
        kind: FieldKind,
    },

    /// A date or decimal format pattern is malformed.
    #[error("invalid format pattern {pattern:?}: {reason}")]
    InvalidFormat { pattern: String, reason: String },

    /// An element matches no field of the record (rejecting policy).
    #[error("unknown element <{element}> in {record}")]
    UnknownElement {
        record: &'static str,
        element: String,
    },

    /// A list field cannot construct its items (rejecting policy).
    #[error("list field {field} cannot construct its item type")]
    ForeignListItem { field: String },

    /// Keyed JSON rendering failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CodecError>;
