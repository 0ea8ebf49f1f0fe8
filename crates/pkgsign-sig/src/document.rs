//! Parsing and canonicalization of `signature.json` documents.

use pkgsign_core::types::Identity;
use serde::Deserialize;

use crate::entry::{Entry, FILES_TAG, IDENTITY_TAG, PACKAGE_JSON_TAG};
use crate::error::ParseError;

/// Name of the signature document inside a package.
pub const SIGNATURE_FILE_NAME: &str = "signature.json";

/// Wire shape of the document, before entries are typed.
#[derive(Debug, Deserialize)]
struct RawDocument {
    entries: Vec<RawEntry>,
    signature: String,
}

#[derive(Debug, Deserialize)]
struct RawEntry {
    entry: String,
    #[serde(flatten)]
    payload: serde_json::Value,
}

/// A parsed signature document: ordered entries plus the detached signature.
///
/// The document is the only source of truth for what the package is supposed
/// to contain and who signed it.
#[derive(Debug, Clone, PartialEq)]
pub struct SignatureDocument {
    /// Entries in signer order.
    pub entries: Vec<Entry>,
    /// ASCII-armored detached PGP signature over
    /// [`canonical_message`](Self::canonical_message).
    pub signature: String,
}

impl SignatureDocument {
    /// Parse a UTF-8 JSON signature document.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::Malformed`] if the text is not JSON of the
    /// required shape, and [`ParseError::UnknownEntryType`] if any entry
    /// carries a tag this implementation does not know.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let raw: RawDocument = serde_json::from_str(text)?;
        let mut entries = Vec::with_capacity(raw.entries.len());
        for raw_entry in raw.entries {
            entries.push(typed_entry(&raw_entry.entry, raw_entry.payload)?);
        }
        Ok(Self {
            entries,
            signature: raw.signature,
        })
    }

    /// The exact byte string the signer signed: each entry's canonical
    /// serialization concatenated in document order. Independent of JSON key
    /// order, whitespace, and host path conventions.
    #[must_use]
    pub fn canonical_message(&self) -> Vec<u8> {
        let mut out = Vec::new();
        for entry in &self.entries {
            entry.write_canonical(&mut out);
        }
        out
    }

    /// Whether a package manifest entry is present anywhere in the document.
    #[must_use]
    pub fn has_package_json_entry(&self) -> bool {
        self.entries
            .iter()
            .any(|entry| matches!(entry, Entry::PackageJson(_)))
    }

    /// The first identity contributed by an entry, in document order.
    #[must_use]
    pub fn signer_identity(&self) -> Option<Identity> {
        self.entries.iter().find_map(Entry::identity)
    }
}

fn typed_entry(tag: &str, payload: serde_json::Value) -> Result<Entry, ParseError> {
    match tag {
        FILES_TAG => Ok(Entry::Files(serde_json::from_value(payload)?)),
        PACKAGE_JSON_TAG => Ok(Entry::PackageJson(serde_json::from_value(payload)?)),
        IDENTITY_TAG => Ok(Entry::Identity(serde_json::from_value(payload)?)),
        other => Err(ParseError::UnknownEntryType(other.to_owned())),
    }
}
