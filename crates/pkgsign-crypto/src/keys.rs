//! Public key resolution for signer identities.

use std::future::Future;
use std::pin::Pin;

use log::debug;

use crate::error::KeyError;

/// Boxed future returned by dyn-compatible async trait methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Default Keybase API host.
const KEYBASE_BASE_URL: &str = "https://keybase.io";

/// Resolves signer identities to ASCII-armored PGP public keys.
pub trait KeySource: Send + Sync {
    /// Fetch the armored primary public key of a Keybase user.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError`] on network failure or when the user has no
    /// published key.
    fn keybase_key<'a>(&'a self, username: &'a str) -> BoxFuture<'a, Result<String, KeyError>>;

    /// Fetch an armored public key from an absolute URL.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError`] on network failure.
    fn key_at_url<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<String, KeyError>>;
}

/// `reqwest`-backed [`KeySource`] speaking the Keybase lookup API.
#[derive(Debug, Clone)]
pub struct HttpKeySource {
    base_url: String,
    http: reqwest::Client,
}

impl HttpKeySource {
    /// Create a source against the public Keybase API.
    #[must_use]
    pub fn new() -> Self {
        Self::with_base_url(KEYBASE_BASE_URL)
    }

    /// Create a source against an alternate Keybase-compatible host.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            http: reqwest::Client::new(),
        }
    }
}

impl Default for HttpKeySource {
    fn default() -> Self {
        Self::new()
    }
}

impl KeySource for HttpKeySource {
    fn keybase_key<'a>(&'a self, username: &'a str) -> BoxFuture<'a, Result<String, KeyError>> {
        Box::pin(async move {
            let url = format!(
                "{}/_/api/1.0/user/lookup.json?usernames={username}&fields=public_keys",
                self.base_url
            );
            debug!("looking up keybase user at {url}");

            let body: serde_json::Value = self
                .http
                .get(&url)
                .send()
                .await
                .map_err(|e| KeyError::Network(e.to_string()))?
                .error_for_status()
                .map_err(|e| KeyError::Network(e.to_string()))?
                .json()
                .await
                .map_err(|e| KeyError::Network(e.to_string()))?;

            let bundle = body["them"][0]["public_keys"]["primary"]["bundle"]
                .as_str()
                .ok_or_else(|| {
                    KeyError::Missing(format!("keybase user {username} has no primary key"))
                })?;
            Ok(bundle.to_owned())
        })
    }

    fn key_at_url<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<String, KeyError>> {
        Box::pin(async move {
            debug!("fetching PGP key from {url}");
            self.http
                .get(url)
                .send()
                .await
                .map_err(|e| KeyError::Network(e.to_string()))?
                .error_for_status()
                .map_err(|e| KeyError::Network(e.to_string()))?
                .text()
                .await
                .map_err(|e| KeyError::Network(e.to_string()))
        })
    }
}
