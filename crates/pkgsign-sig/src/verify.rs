//! The package verifier: one verdict per package directory.

use std::path::Path;

use log::debug;
use pkgsign_core::hash::read_file_utf8;
use pkgsign_core::manifest::Manifest;
use pkgsign_core::trust::TrustStore;
use pkgsign_core::types::{VerificationResult, Verdict};
use pkgsign_crypto::verifier::VerifierSet;

use crate::document::{SignatureDocument, SIGNATURE_FILE_NAME};
use crate::entry::CheckContext;
use crate::error::ParseError;

/// Verify one package directory against its embedded signature document.
///
/// `rel_files_on_disk` lists every file in the package relative to `dir`;
/// host-native separators are accepted. `expected_package_name` is the name
/// under which the package was installed. The directory is treated as
/// immutable for the duration of the call.
pub async fn verify_package(
    dir: &Path,
    rel_files_on_disk: &[String],
    expected_package_name: &str,
    verifiers: &VerifierSet,
    trust_store: &TrustStore,
) -> VerificationResult {
    let verdict = verdict_for(
        dir,
        rel_files_on_disk,
        expected_package_name,
        verifiers,
        trust_store,
    )
    .await;
    VerificationResult {
        package_name: expected_package_name.to_owned(),
        verdict,
    }
}

/// The verdict state machine. Transitions run in order; the first that
/// applies terminates.
async fn verdict_for(
    dir: &Path,
    rel_files_on_disk: &[String],
    expected_package_name: &str,
    verifiers: &VerifierSet,
    trust_store: &TrustStore,
) -> Verdict {
    let sig_path = dir.join(SIGNATURE_FILE_NAME);
    let raw = match read_file_utf8(&sig_path) {
        Ok(raw) => raw,
        Err(e) => {
            debug!("no signature document: {e}");
            return Verdict::Unsigned("Missing or unparsable signature.json".to_owned());
        }
    };
    let document = match SignatureDocument::parse(&raw) {
        Ok(document) => document,
        Err(ParseError::UnknownEntryType(tag)) => {
            return Verdict::Compromised(format!("Unknown entry type {tag} in signature.json"));
        }
        Err(ParseError::Malformed(e)) => {
            debug!("unparsable signature document at {}: {e}", sig_path.display());
            return Verdict::Unsigned("Missing or unparsable signature.json".to_owned());
        }
    };

    // The signed bytes are fixed before any content check runs.
    let message = document.canonical_message();

    let ctx = CheckContext {
        dir,
        rel_files: rel_files_on_disk,
        has_package_json_entry: document.has_package_json_entry(),
    };
    for entry in &document.entries {
        if let Some(failure) = entry.check(&ctx) {
            return failure;
        }
    }

    let Some(identity) = document.signer_identity() else {
        return Verdict::Compromised("No identity information in signature.json".to_owned());
    };

    let verifier = verifiers.for_identity(&identity);
    if !verifier.verify(&identity, &document.signature, &message).await {
        return Verdict::Compromised("The signature does not match".to_owned());
    }

    // The name cross-check runs after cryptographic validation: a mismatched
    // name on a genuinely signed package is a substitution signal.
    let manifest = match Manifest::load(dir) {
        Ok(manifest) => manifest,
        Err(e) => {
            debug!("manifest load failed in {}: {e}", dir.display());
            return Verdict::Compromised("Missing or unparsable package.json".to_owned());
        }
    };
    if manifest.name != expected_package_name {
        return Verdict::Compromised(
            "Provided package name in package.json did not match expected package name".to_owned(),
        );
    }

    if trust_store.is_trusted(&identity, expected_package_name) {
        Verdict::Trusted
    } else {
        Verdict::Untrusted(identity)
    }
}
