//! OpenPGP armor parsing and detached signature checks.

use pgp::{Deserializable, SignedPublicKey, StandaloneSignature};

use crate::error::PgpError;

/// Verify an ASCII-armored detached signature over `message` under
/// `armored_key`. The signature is checked against the primary key first,
/// then against each subkey; the first match wins.
///
/// # Errors
///
/// Returns [`PgpError::Parse`] if either armor fails to parse, and
/// [`PgpError::BadSignature`] if no key in the certificate validates the
/// signature.
pub fn verify_detached(
    armored_key: &str,
    armored_signature: &str,
    message: &[u8],
) -> Result<(), PgpError> {
    let (key, _) =
        SignedPublicKey::from_string(armored_key).map_err(|e| PgpError::Parse(e.to_string()))?;
    let (signature, _) = StandaloneSignature::from_string(armored_signature)
        .map_err(|e| PgpError::Parse(e.to_string()))?;

    if signature.verify(&key, message).is_ok() {
        return Ok(());
    }
    if key
        .public_subkeys
        .iter()
        .any(|subkey| signature.verify(subkey, message).is_ok())
    {
        return Ok(());
    }
    Err(PgpError::BadSignature)
}
