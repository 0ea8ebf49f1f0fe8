//! Error types for signature document parsing.

use thiserror::Error;

/// Errors raised while parsing a `signature.json` document.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The document is not valid JSON of the required shape.
    #[error("malformed signature document: {0}")]
    Malformed(#[from] serde_json::Error),
    /// An entry carries a type tag this implementation does not know. Never
    /// skipped silently: an unknown entry could hide signed-over content.
    #[error("unknown entry type '{0}'")]
    UnknownEntryType(String),
}
