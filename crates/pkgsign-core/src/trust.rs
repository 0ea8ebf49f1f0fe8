//! Persistent per-operator trust decisions.
//!
//! One record file per package name keeps concurrent additions across
//! processes safe without a lock protocol: names are independent and the last
//! writer wins per name.

use std::path::{Path, PathBuf};

use log::debug;
use thiserror::Error;

use crate::types::{Identity, IdentityRecord};

/// Directory name of the trust store under the operator's home.
const STORE_DIR_NAME: &str = ".pkgsign-trust-store";

/// Suffix of trust record files.
const RECORD_SUFFIX: &str = ".trust";

/// Error returned when a trust decision cannot be persisted.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store directory or record file could not be written.
    #[error("failed to write trust record: {0}")]
    Io(#[from] std::io::Error),
    /// The identity could not be encoded.
    #[error("failed to encode trust record: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Handle to the on-disk trust store.
///
/// Reads never fail: any IO or parse problem reads as "not trusted", since
/// absence of a record is not a security event. Writes are atomic per name
/// (temp sibling then rename).
#[derive(Debug, Clone)]
pub struct TrustStore {
    root: PathBuf,
}

impl TrustStore {
    /// Open the operator's default store, `<home>/.pkgsign-trust-store`.
    #[must_use]
    pub fn open_default() -> Self {
        Self {
            root: home_dir().join(STORE_DIR_NAME),
        }
    }

    /// Open a store rooted at an explicit directory.
    pub fn at(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The directory this store reads and writes.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `true` iff the operator has approved `identity` to sign
    /// `package_name`. Strict field-by-field comparison against the stored
    /// record, absent fields included.
    #[must_use]
    pub fn is_trusted(&self, identity: &Identity, package_name: &str) -> bool {
        let path = self.record_path(package_name);
        let Ok(raw) = std::fs::read_to_string(&path) else {
            return false;
        };
        match serde_json::from_str::<IdentityRecord>(&raw) {
            Ok(record) => record == identity.to_record(),
            Err(e) => {
                debug!("ignoring unreadable trust record {}: {e}", path.display());
                false
            }
        }
    }

    /// Record that `identity` may sign `package_name`, replacing any prior
    /// record for that name. Creates the store directory lazily.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the directory cannot be created or the
    /// record cannot be encoded or written.
    pub fn add_trusted(&self, identity: &Identity, package_name: &str) -> Result<(), StoreError> {
        std::fs::create_dir_all(&self.root)?;
        let encoded = serde_json::to_string(&identity.to_record())?;
        let tmp = tempfile::NamedTempFile::new_in(&self.root)?;
        std::fs::write(tmp.path(), encoded)?;
        tmp.persist(self.record_path(package_name))
            .map_err(|e| StoreError::Io(e.error))?;
        debug!("trusted {identity} for {package_name}");
        Ok(())
    }

    fn record_path(&self, package_name: &str) -> PathBuf {
        self.root
            .join(format!("{}{RECORD_SUFFIX}", record_name(package_name)))
    }
}

/// Flatten a package name into a single path segment. Scoped names contain a
/// `/` which must not introduce a subdirectory.
fn record_name(package_name: &str) -> String {
    package_name.replace('/', "%2F")
}

fn home_dir() -> PathBuf {
    #[cfg(windows)]
    let var = "USERPROFILE";
    #[cfg(not(windows))]
    let var = "HOME";
    std::env::var(var)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."))
}
