//! Identity verifiers: decide whether a signature over a message is valid
//! for a given signer identity.

use std::sync::Arc;

use log::debug;
use pkgsign_core::types::Identity;

use crate::keys::{BoxFuture, KeySource};
use crate::pgp::verify_detached;

/// Decides cryptographic validity of a signature for one identity kind.
///
/// Implementations return `false` on any cryptographic mismatch, malformed
/// key, or resolution failure; callers treat `false` uniformly as "signature
/// does not match".
pub trait IdentityVerifier: Send + Sync {
    /// `true` iff `signature` is a valid detached signature over `message`
    /// by the key `identity` resolves to.
    fn verify<'a>(
        &'a self,
        identity: &'a Identity,
        signature: &'a str,
        message: &'a [u8],
    ) -> BoxFuture<'a, bool>;
}

/// Verifies signatures made by Keybase users.
pub struct KeybaseVerifier {
    keys: Arc<dyn KeySource>,
}

impl KeybaseVerifier {
    /// Create a verifier resolving keys through `keys`.
    #[must_use]
    pub fn new(keys: Arc<dyn KeySource>) -> Self {
        Self { keys }
    }
}

impl IdentityVerifier for KeybaseVerifier {
    fn verify<'a>(
        &'a self,
        identity: &'a Identity,
        signature: &'a str,
        message: &'a [u8],
    ) -> BoxFuture<'a, bool> {
        Box::pin(async move {
            let Identity::Keybase(username) = identity else {
                return false;
            };
            let key = match self.keys.keybase_key(username).await {
                Ok(key) => key,
                Err(e) => {
                    debug!("key resolution failed for keybase user {username}: {e}");
                    return false;
                }
            };
            match verify_detached(&key, signature, message) {
                Ok(()) => true,
                Err(e) => {
                    debug!("signature check failed for keybase user {username}: {e}");
                    false
                }
            }
        })
    }
}

/// Verifies signatures made with a key hosted at a PGP public key URL.
pub struct PgpUrlVerifier {
    keys: Arc<dyn KeySource>,
}

impl PgpUrlVerifier {
    /// Create a verifier resolving keys through `keys`.
    #[must_use]
    pub fn new(keys: Arc<dyn KeySource>) -> Self {
        Self { keys }
    }
}

impl IdentityVerifier for PgpUrlVerifier {
    fn verify<'a>(
        &'a self,
        identity: &'a Identity,
        signature: &'a str,
        message: &'a [u8],
    ) -> BoxFuture<'a, bool> {
        Box::pin(async move {
            let Identity::PgpUrl(url) = identity else {
                return false;
            };
            let key = match self.keys.key_at_url(url).await {
                Ok(key) => key,
                Err(e) => {
                    debug!("key fetch failed from {url}: {e}");
                    return false;
                }
            };
            match verify_detached(&key, signature, message) {
                Ok(()) => true,
                Err(e) => {
                    debug!("signature check failed for key at {url}: {e}");
                    false
                }
            }
        })
    }
}

/// Owns one verifier per identity kind and routes by variant.
pub struct VerifierSet {
    keybase: KeybaseVerifier,
    pgp_url: PgpUrlVerifier,
}

impl VerifierSet {
    /// Build a set sharing one key source across both verifiers.
    #[must_use]
    pub fn new(keys: Arc<dyn KeySource>) -> Self {
        Self {
            keybase: KeybaseVerifier::new(Arc::clone(&keys)),
            pgp_url: PgpUrlVerifier::new(keys),
        }
    }

    /// The verifier responsible for `identity`'s kind.
    #[must_use]
    pub fn for_identity(&self, identity: &Identity) -> &dyn IdentityVerifier {
        match identity {
            Identity::Keybase(_) => &self.keybase,
            Identity::PgpUrl(_) => &self.pgp_url,
        }
    }
}
