//! The npm package manifest (`package.json`), reduced to the fields pkgsign
//! inspects.

use std::path::Path;

use semver::Version;
use serde::Deserialize;
use thiserror::Error;

/// Error loading or parsing `package.json`.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The manifest file could not be read.
    #[error("failed to read package.json: {0}")]
    Io(#[from] std::io::Error),
    /// The manifest file is not valid JSON of the expected shape.
    #[error("failed to parse package.json: {0}")]
    Parse(#[from] serde_json::Error),
}

/// The subset of `package.json` that verification inspects. Unknown fields
/// are ignored; packages carry plenty.
#[derive(Debug, Clone, Deserialize)]
pub struct Manifest {
    /// Declared package name.
    pub name: String,
    /// Declared version, when present.
    #[serde(default)]
    pub version: Option<Version>,
    /// Entry-point module, when declared.
    #[serde(default)]
    pub main: Option<String>,
}

impl Manifest {
    /// Load `<dir>/package.json`.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError`] if the file is missing, unreadable, or not a
    /// JSON object with a string `name`.
    pub fn load(dir: &Path) -> Result<Self, LoadError> {
        let raw = std::fs::read_to_string(dir.join("package.json"))?;
        Ok(serde_json::from_str(&raw)?)
    }
}
