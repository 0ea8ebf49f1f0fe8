//! Signer identities and verification verdicts.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A signer identity. Two identities are equal iff they are the same variant
/// and their payloads are byte-equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Identity {
    /// A Keybase user; the public key is resolved through the Keybase API.
    Keybase(String),
    /// A PGP public key hosted at an absolute URL.
    PgpUrl(String),
}

impl Identity {
    /// Convert to the wire record stored in trust files and signature entries.
    #[must_use]
    pub fn to_record(&self) -> IdentityRecord {
        match self {
            Self::Keybase(user) => IdentityRecord {
                keybase_user: Some(user.clone()),
                pgp_public_key_url: None,
            },
            Self::PgpUrl(url) => IdentityRecord {
                keybase_user: None,
                pgp_public_key_url: Some(url.clone()),
            },
        }
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Keybase(user) => write!(f, "keybase:{user}"),
            Self::PgpUrl(url) => write!(f, "pgp:{url}"),
        }
    }
}

/// Wire form of an identity, as stored in trust records and identity entries.
///
/// Exactly one field is expected to be populated. `deny_unknown_fields` keeps
/// trust-record comparison strict: a record carrying anything beyond the two
/// known fields never matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IdentityRecord {
    /// Keybase username of the signer.
    #[serde(rename = "keybaseUser", skip_serializing_if = "Option::is_none", default)]
    pub keybase_user: Option<String>,
    /// URL serving the signer's ASCII-armored PGP public key.
    #[serde(
        rename = "pgpPublicKeyUrl",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub pgp_public_key_url: Option<String>,
}

impl IdentityRecord {
    /// The identity this record names, with the Keybase field taking
    /// precedence when both are populated. `None` when neither is.
    #[must_use]
    pub fn identity(&self) -> Option<Identity> {
        if let Some(user) = &self.keybase_user {
            return Some(Identity::Keybase(user.clone()));
        }
        self.pgp_public_key_url
            .as_ref()
            .map(|url| Identity::PgpUrl(url.clone()))
    }
}

/// Outcome of verifying one package directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// The signature is valid and the operator trusts the signer for this
    /// package name.
    Trusted,
    /// The signature is valid but the operator has no trust record for this
    /// signer and package name.
    Untrusted(Identity),
    /// The package carries no usable signature document.
    Unsigned(String),
    /// The package contents do not match what was signed.
    Compromised(String),
}

/// A verdict paired with the package name it was produced for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationResult {
    /// The expected package name the verification ran against.
    pub package_name: String,
    /// The verdict.
    pub verdict: Verdict,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identities_equal_only_within_a_variant() {
        assert_eq!(
            Identity::Keybase("alice".to_owned()),
            Identity::Keybase("alice".to_owned())
        );
        assert_ne!(
            Identity::Keybase("alice".to_owned()),
            Identity::Keybase("bob".to_owned())
        );
        assert_ne!(
            Identity::Keybase("alice".to_owned()),
            Identity::PgpUrl("alice".to_owned())
        );
    }

    #[test]
    fn record_rejects_unknown_fields() {
        let raw = r#"{"keybaseUser":"alice","extra":"x"}"#;
        assert!(serde_json::from_str::<IdentityRecord>(raw).is_err());
    }

    #[test]
    fn record_serialises_only_populated_fields() {
        let json = serde_json::to_string(&Identity::Keybase("alice".to_owned()).to_record())
            .unwrap();
        assert_eq!(json, r#"{"keybaseUser":"alice"}"#);
    }

    #[test]
    fn record_prefers_keybase_when_both_populated() {
        let record = IdentityRecord {
            keybase_user: Some("alice".to_owned()),
            pgp_public_key_url: Some("https://example.com/key.asc".to_owned()),
        };
        assert_eq!(record.identity(), Some(Identity::Keybase("alice".to_owned())));
    }

    #[test]
    fn empty_record_names_nobody() {
        let record = IdentityRecord {
            keybase_user: None,
            pgp_public_key_url: None,
        };
        assert_eq!(record.identity(), None);
    }
}
