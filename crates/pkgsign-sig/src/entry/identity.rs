//! The identity entry: who signed the document.

use pkgsign_core::types::{Identity, IdentityRecord};
use serde::{Deserialize, Serialize};

/// Wire field name of the Keybase username.
const KEYBASE_FIELD: &str = "keybaseUser";
/// Wire field name of the PGP public key URL.
const PGP_URL_FIELD: &str = "pgpPublicKeyUrl";

/// Declares the signer of a document. Content-free: its claim is carried
/// entirely by the canonical serialization under the signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityEntry {
    /// Keybase username, when the signer is a Keybase user.
    #[serde(rename = "keybaseUser", skip_serializing_if = "Option::is_none", default)]
    pub keybase_user: Option<String>,
    /// Key URL, when the signer hosts their own PGP key.
    #[serde(
        rename = "pgpPublicKeyUrl",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub pgp_public_key_url: Option<String>,
}

impl IdentityEntry {
    /// Populated fields in fixed order, Keybase first; absent fields emit
    /// no line at all.
    pub(crate) fn write_canonical(&self, out: &mut Vec<u8>) {
        if let Some(user) = &self.keybase_user {
            write_field(out, KEYBASE_FIELD, user);
        }
        if let Some(url) = &self.pgp_public_key_url {
            write_field(out, PGP_URL_FIELD, url);
        }
    }

    /// The identity declared by this entry, Keybase taking precedence when
    /// both fields are populated.
    #[must_use]
    pub fn identity(&self) -> Option<Identity> {
        IdentityRecord {
            keybase_user: self.keybase_user.clone(),
            pgp_public_key_url: self.pgp_public_key_url.clone(),
        }
        .identity()
    }
}

fn write_field(out: &mut Vec<u8>, field: &str, value: &str) {
    out.extend_from_slice(field.as_bytes());
    out.push(b'=');
    out.extend_from_slice(value.as_bytes());
    out.push(b'\n');
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_form_emits_keybase_before_url() {
        let entry = IdentityEntry {
            keybase_user: Some("alice".to_owned()),
            pgp_public_key_url: Some("https://example.com/k.asc".to_owned()),
        };
        let mut out = Vec::new();
        entry.write_canonical(&mut out);
        assert_eq!(
            out,
            b"keybaseUser=alice\npgpPublicKeyUrl=https://example.com/k.asc\n"
        );
    }

    #[test]
    fn absent_fields_emit_nothing() {
        let entry = IdentityEntry {
            keybase_user: None,
            pgp_public_key_url: Some("https://example.com/k.asc".to_owned()),
        };
        let mut out = Vec::new();
        entry.write_canonical(&mut out);
        assert_eq!(out, b"pgpPublicKeyUrl=https://example.com/k.asc\n");
    }

    #[test]
    fn empty_entry_contributes_no_identity() {
        let entry = IdentityEntry {
            keybase_user: None,
            pgp_public_key_url: None,
        };
        assert_eq!(entry.identity(), None);
        let mut out = Vec::new();
        entry.write_canonical(&mut out);
        assert!(out.is_empty());
    }
}
