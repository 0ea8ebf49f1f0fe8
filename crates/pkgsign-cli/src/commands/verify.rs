//! `pkgsign verify` — verify a package directory or registry tarball.

use std::ffi::OsStr;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use log::info;
use tempfile::TempDir;

use pkgsign_core::manifest::Manifest;
use pkgsign_core::trust::TrustStore;
use pkgsign_core::types::{Identity, VerificationResult, Verdict};
use pkgsign_crypto::keys::HttpKeySource;
use pkgsign_crypto::verifier::VerifierSet;
use pkgsign_pack::unpack::unpack_package;
use pkgsign_sig::verify::verify_package;

use crate::walker::{find_packages, relative_files};

/// Options for the verify command.
#[derive(Debug, Clone, Default)]
pub struct VerifyOptions {
    /// Expected package name; defaults to the manifest's declared name.
    pub package_name: Option<String>,
    /// Discover and verify every nested package under the target.
    pub all: bool,
    /// Never prompt; untrusted results are reported as they are.
    pub non_interactive: bool,
}

/// Verify `path` (a package directory or `.tgz` tarball) and print one
/// summary line per package. Returns every result for the caller to turn
/// into an exit code.
///
/// # Errors
///
/// Returns an error if the target cannot be read or extracted; verification
/// failures are verdicts, not errors.
pub async fn run_verify(
    path: &Path,
    opts: &VerifyOptions,
    trust: &TrustStore,
) -> Result<Vec<VerificationResult>> {
    let verifiers = VerifierSet::new(Arc::new(HttpKeySource::new()));

    let (target, _scratch) = resolve_target(path)?;
    let packages = if opts.all {
        find_packages(&target)?
    } else {
        vec![target]
    };
    info!("verifying {} package(s)", packages.len());

    let mut results = Vec::with_capacity(packages.len());
    for dir in &packages {
        let result = verify_one(dir, opts, &verifiers, trust).await?;
        println!("{}", render(&result));
        results.push(result);
    }

    if results.len() > 1 {
        println!("{}", summary(&results));
    }
    Ok(results)
}

/// `true` when every result is acceptable: `Trusted` always is, `Untrusted`
/// only when no prompt was on offer.
#[must_use]
pub fn all_ok(results: &[VerificationResult], non_interactive: bool) -> bool {
    results.iter().all(|result| match result.verdict {
        Verdict::Trusted => true,
        Verdict::Untrusted(_) => non_interactive,
        Verdict::Unsigned(_) | Verdict::Compromised(_) => false,
    })
}

/// Extract tarball targets to a scratch directory; hand directories through.
/// The scratch directory must outlive verification.
fn resolve_target(path: &Path) -> Result<(PathBuf, Option<TempDir>)> {
    if !is_tarball(path) {
        return Ok((path.to_path_buf(), None));
    }
    let scratch = tempfile::tempdir()?;
    let root = unpack_package(path, scratch.path())
        .with_context(|| format!("failed to extract {}", path.display()))?;
    Ok((root, Some(scratch)))
}

fn is_tarball(path: &Path) -> bool {
    path.is_file()
        && path
            .file_name()
            .and_then(OsStr::to_str)
            .is_some_and(|name| name.ends_with(".tgz") || name.ends_with(".tar.gz"))
}

async fn verify_one(
    dir: &Path,
    opts: &VerifyOptions,
    verifiers: &VerifierSet,
    trust: &TrustStore,
) -> Result<VerificationResult> {
    let expected = match &opts.package_name {
        Some(name) => name.clone(),
        None => expected_name(dir),
    };
    let files = relative_files(dir)?;
    let mut result = verify_package(dir, &files, &expected, verifiers, trust).await;

    let signer = if let Verdict::Untrusted(identity) = &result.verdict {
        Some(identity.clone())
    } else {
        None
    };
    if let Some(identity) = signer {
        if !opts.non_interactive && confirm_trust(&identity, &expected)? {
            trust.add_trusted(&identity, &expected)?;
            result = verify_package(dir, &files, &expected, verifiers, trust).await;
        }
    }
    Ok(result)
}

/// The name the operator installed this package under: the manifest's
/// declared name when readable, the directory name otherwise.
fn expected_name(dir: &Path) -> String {
    if let Ok(manifest) = Manifest::load(dir) {
        return manifest.name;
    }
    dir.file_name()
        .map_or_else(|| ".".to_owned(), |name| name.to_string_lossy().into_owned())
}

fn confirm_trust(identity: &Identity, package_name: &str) -> Result<bool> {
    print!("Trust {identity} to sign {package_name}? [y/N] ");
    std::io::stdout().flush()?;
    let mut answer = String::new();
    std::io::stdin().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}

fn render(result: &VerificationResult) -> String {
    match &result.verdict {
        Verdict::Trusted => format!("{}: trusted", result.package_name),
        Verdict::Untrusted(identity) => format!("{}: untrusted ({identity})", result.package_name),
        Verdict::Unsigned(reason) => format!("{}: UNSIGNED: {reason}", result.package_name),
        Verdict::Compromised(reason) => format!("{}: COMPROMISED: {reason}", result.package_name),
    }
}

fn summary(results: &[VerificationResult]) -> String {
    let trusted = count(results, |v| matches!(v, Verdict::Trusted));
    let untrusted = count(results, |v| matches!(v, Verdict::Untrusted(_)));
    let unsigned = count(results, |v| matches!(v, Verdict::Unsigned(_)));
    let compromised = count(results, |v| matches!(v, Verdict::Compromised(_)));
    format!(
        "{} package(s): {trusted} trusted, {untrusted} untrusted, {unsigned} unsigned, {compromised} compromised",
        results.len()
    )
}

fn count(results: &[VerificationResult], pred: impl Fn(&Verdict) -> bool) -> usize {
    results.iter().filter(|r| pred(&r.verdict)).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn result(verdict: Verdict) -> VerificationResult {
        VerificationResult {
            package_name: "p".to_owned(),
            verdict,
        }
    }

    #[test]
    fn untrusted_is_acceptable_only_without_a_prompt() {
        let results = [result(Verdict::Untrusted(Identity::Keybase("alice".to_owned())))];
        assert!(all_ok(&results, true));
        assert!(!all_ok(&results, false));
    }

    #[test]
    fn compromised_is_never_acceptable() {
        let results = [
            result(Verdict::Trusted),
            result(Verdict::Compromised("tampered".to_owned())),
        ];
        assert!(!all_ok(&results, true));
    }

    #[test]
    fn expected_name_prefers_the_manifest() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("package.json"), r#"{"name":"actual"}"#).unwrap();
        assert_eq!(expected_name(dir.path()), "actual");
    }

    #[test]
    fn expected_name_falls_back_to_the_directory() {
        let dir = tempdir().unwrap();
        let pkg = dir.path().join("fallback");
        fs::create_dir(&pkg).unwrap();
        assert_eq!(expected_name(&pkg), "fallback");
    }

    #[test]
    fn render_shows_the_failure_reason() {
        let line = render(&result(Verdict::Unsigned("Missing or unparsable signature.json".to_owned())));
        assert_eq!(line, "p: UNSIGNED: Missing or unparsable signature.json");
    }
}
