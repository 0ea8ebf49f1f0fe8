//! Error types for tarball extraction.

use thiserror::Error;

/// Errors that can occur when extracting a package tarball.
#[derive(Debug, Error)]
pub enum PackError {
    /// An I/O or decompression error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// The archive does not contain a package root directory.
    #[error("no package root in archive (expected a top-level '{0}/' directory)")]
    MissingPackageRoot(String),
}
