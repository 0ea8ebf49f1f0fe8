//! Error types for key resolution and signature verification.

use thiserror::Error;

/// Errors that can occur while resolving a signer's public key.
#[derive(Debug, Error)]
pub enum KeyError {
    /// A network error reaching the key host.
    #[error("failed to fetch key: {0}")]
    Network(String),
    /// The response did not contain a usable key.
    #[error("no usable key in response: {0}")]
    Missing(String),
}

/// Errors raised while parsing or checking OpenPGP material.
#[derive(Debug, Error)]
pub enum PgpError {
    /// The armored input could not be parsed.
    #[error("failed to parse PGP armor: {0}")]
    Parse(String),
    /// No key in the certificate validates the signature over the message.
    #[error("signature does not match")]
    BadSignature,
}
