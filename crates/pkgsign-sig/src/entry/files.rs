//! The files entry: relative paths and their SHA-512 hashes.

use std::collections::{HashMap, HashSet};

use log::debug;
use pkgsign_core::hash::sha512_file;
use pkgsign_core::types::Verdict;
use serde::{Deserialize, Serialize};

use super::CheckContext;

/// The signature file itself; it can never be covered by a files entry.
pub(crate) const SIGNATURE_FILE: &str = "signature.json";

/// The manifest file; skipped when a package manifest entry signs a weaker
/// invariant over it instead.
pub(crate) const MANIFEST_FILE: &str = "package.json";

/// One `(relative path, hash)` pair inside a files entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileHash {
    /// Forward-slash relative path inside the package.
    pub path: String,
    /// Lowercase hex SHA-512 of the file contents.
    pub sha512: String,
}

/// An ordered list of files and their hashes.
///
/// The order is the signer's and is part of the signed message; it is never
/// sorted here. A reorder invalidates the signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilesEntry {
    /// The signed file list, in signer order.
    pub files: Vec<FileHash>,
}

impl FilesEntry {
    pub(crate) fn write_canonical(&self, out: &mut Vec<u8>) {
        for file in &self.files {
            out.extend_from_slice(file.path.as_bytes());
            out.push(b'\n');
            out.extend_from_slice(file.sha512.as_bytes());
            out.push(b'\n');
        }
    }

    /// Diff the signed file set against the package contents. Three failure
    /// modes, first hit wins: a file on disk the signature does not list, a
    /// listed file whose hash differs, a listed file missing from disk.
    pub(crate) fn check(&self, ctx: &CheckContext<'_>) -> Option<Verdict> {
        let signed: HashMap<&str, &str> = self
            .files
            .iter()
            .map(|f| (f.path.as_str(), f.sha512.as_str()))
            .collect();

        let mut on_disk: HashSet<String> = HashSet::with_capacity(ctx.rel_files.len());

        for raw in ctx.rel_files {
            let rel = normalize_path(raw);
            if rel == SIGNATURE_FILE || (ctx.has_package_json_entry && rel == MANIFEST_FILE) {
                on_disk.insert(rel);
                continue;
            }

            let Some(expected) = signed.get(rel.as_str()) else {
                return Some(Verdict::Compromised(format!(
                    "{rel} exists in the package, but was not in the signature"
                )));
            };

            let path = ctx.dir.join(&rel);
            let matches = match sha512_file(&path) {
                Ok(actual) => actual.eq_ignore_ascii_case(expected),
                Err(e) => {
                    debug!("cannot attest unreadable file: {e}");
                    false
                }
            };
            if !matches {
                return Some(Verdict::Compromised(format!(
                    "{rel} does not have content that was signed for (mismatched hash)"
                )));
            }

            on_disk.insert(rel);
        }

        for file in &self.files {
            if file.path == SIGNATURE_FILE {
                continue;
            }
            if !on_disk.contains(&file.path) {
                return Some(Verdict::Compromised(format!(
                    "{} is expected by the signature, but is missing in the package",
                    file.path
                )));
            }
        }

        None
    }
}

/// Backslashes from a Windows directory listing compare equal to the
/// forward-slash paths a signer wrote.
fn normalize_path(path: &str) -> String {
    path.replace('\\', "/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_form_preserves_signer_order() {
        let entry = FilesEntry {
            files: vec![
                FileHash {
                    path: "z.txt".to_owned(),
                    sha512: "bb".to_owned(),
                },
                FileHash {
                    path: "a.txt".to_owned(),
                    sha512: "aa".to_owned(),
                },
            ],
        };
        let mut out = Vec::new();
        entry.write_canonical(&mut out);
        assert_eq!(out, b"z.txt\nbb\na.txt\naa\n");
    }

    #[test]
    fn normalize_rewrites_backslashes_only() {
        assert_eq!(normalize_path("lib\\util\\a.js"), "lib/util/a.js");
        assert_eq!(normalize_path("lib/util/a.js"), "lib/util/a.js");
    }
}
