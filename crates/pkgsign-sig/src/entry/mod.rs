//! Entry types: the typed claims a signature document can carry.
//!
//! Each entry has a stable type tag, a deterministic canonical serialization,
//! a content check against a package directory, and an optional identity
//! contribution. Dispatch is by matching on the variant.

mod files;
mod identity;
mod package_json;

pub use files::{FileHash, FilesEntry};
pub use identity::IdentityEntry;
pub use package_json::{ManifestConstraint, PackageJsonEntry};

use std::path::Path;

use pkgsign_core::types::{Identity, Verdict};

/// Type tag of the files entry.
pub const FILES_TAG: &str = "files/v1alpha1";
/// Type tag of the package manifest entry.
pub const PACKAGE_JSON_TAG: &str = "packageJson/v1alpha1";
/// Type tag of the identity entry.
pub const IDENTITY_TAG: &str = "identity/v1alpha1";

/// Context handed to entry content checks.
#[derive(Debug, Clone, Copy)]
pub struct CheckContext<'a> {
    /// Package directory under verification.
    pub dir: &'a Path,
    /// Relative paths of every file on disk in the package, as reported by
    /// the caller. Separators may be host-native; checks normalize to `/`.
    pub rel_files: &'a [String],
    /// Whether the document carries a package manifest entry, which takes
    /// over responsibility for `package.json`.
    pub has_package_json_entry: bool,
}

/// One typed claim inside a signature document.
#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    /// File list with per-file SHA-512 hashes.
    Files(FilesEntry),
    /// Constraints over a subset of `package.json` fields.
    PackageJson(PackageJsonEntry),
    /// The signer's identity.
    Identity(IdentityEntry),
}

impl Entry {
    /// The stable type tag of this entry.
    #[must_use]
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Files(_) => FILES_TAG,
            Self::PackageJson(_) => PACKAGE_JSON_TAG,
            Self::Identity(_) => IDENTITY_TAG,
        }
    }

    /// Append this entry's canonical serialization to `out`.
    pub fn write_canonical(&self, out: &mut Vec<u8>) {
        match self {
            Self::Files(entry) => entry.write_canonical(out),
            Self::PackageJson(entry) => entry.write_canonical(out),
            Self::Identity(entry) => entry.write_canonical(out),
        }
    }

    /// Check this entry's claim against the package contents. `None` means
    /// the claim holds; `Some` carries the failure verdict.
    #[must_use]
    pub fn check(&self, ctx: &CheckContext<'_>) -> Option<Verdict> {
        match self {
            Self::Files(entry) => entry.check(ctx),
            Self::PackageJson(entry) => entry.check(ctx),
            Self::Identity(_) => None,
        }
    }

    /// The identity this entry contributes, if any.
    #[must_use]
    pub fn identity(&self) -> Option<Identity> {
        match self {
            Self::Identity(entry) => entry.identity(),
            Self::Files(_) | Self::PackageJson(_) => None,
        }
    }
}
