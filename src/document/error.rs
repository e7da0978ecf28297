//! Document parse/serialize errors.

use quick_xml::escape::EscapeError;
use quick_xml::events::attributes::AttrError;
use thiserror::Error;

/// Errors raised while turning text into a [`Document`](super::Document)
/// and back.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("XML parse error at position {position}")]
    Xml {
        position: u64,
        #[source]
        source: quick_xml::Error,
    },

    #[error("malformed attribute")]
    Attr(#[from] AttrError),

    #[error("invalid escape sequence in attribute value")]
    Escape(#[from] EscapeError),

    #[error("markup is not valid UTF-8")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("unexpected closing tag `</{0}>`")]
    UnexpectedEnd(String),

    #[error("element `<{0}>` is never closed")]
    Unclosed(String),

    #[error("more than one root element (`<{0}>` after the root)")]
    MultipleRoots(String),

    #[error("document has no root element")]
    NoRoot,

    #[error("failed to write document: {0}")]
    Write(String),
}
