//! Package discovery and file listing.

use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// Directory holding a package's own dependencies. Its contents belong to
/// nested packages, which are discovered and verified independently.
const NODE_MODULES: &str = "node_modules";

/// List every file under `dir` as a forward-slash relative path, excluding
/// anything under `node_modules/`. The listing is sorted so verdicts are
/// deterministic.
///
/// # Errors
///
/// Returns an IO error if the directory cannot be walked.
pub fn relative_files(dir: &Path) -> io::Result<Vec<String>> {
    let mut files = Vec::new();
    let walker = WalkDir::new(dir)
        .into_iter()
        .filter_entry(|entry| entry.file_name() != NODE_MODULES);

    for entry in walker {
        let entry = entry.map_err(|e| io::Error::other(e.to_string()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let rel = entry
            .path()
            .strip_prefix(dir)
            .map_err(|e| io::Error::other(e.to_string()))?;
        files.push(forward_slashed(rel));
    }

    files.sort();
    Ok(files)
}

/// Every directory under `root` (inclusive) containing a `package.json`,
/// sorted for deterministic iteration.
///
/// # Errors
///
/// Returns an IO error if the tree cannot be walked.
pub fn find_packages(root: &Path) -> io::Result<Vec<PathBuf>> {
    let mut dirs = Vec::new();
    for entry in WalkDir::new(root) {
        let entry = entry.map_err(|e| io::Error::other(e.to_string()))?;
        if entry.file_type().is_file() && entry.file_name() == "package.json" {
            if let Some(parent) = entry.path().parent() {
                dirs.push(parent.to_path_buf());
            }
        }
    }
    dirs.sort();
    Ok(dirs)
}

/// Join path components with `/` regardless of the host separator.
fn forward_slashed(path: &Path) -> String {
    path.components()
        .map(|component| component.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn lists_nested_files_with_forward_slashes() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("index.js"), "x").unwrap();
        fs::create_dir_all(dir.path().join("lib/util")).unwrap();
        fs::write(dir.path().join("lib/util/a.js"), "y").unwrap();

        let files = relative_files(dir.path()).unwrap();
        assert_eq!(files, vec!["index.js", "lib/util/a.js"]);
    }

    #[test]
    fn node_modules_contents_are_not_package_files() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("index.js"), "x").unwrap();
        fs::create_dir_all(dir.path().join("node_modules/dep")).unwrap();
        fs::write(dir.path().join("node_modules/dep/index.js"), "y").unwrap();

        let files = relative_files(dir.path()).unwrap();
        assert_eq!(files, vec!["index.js"]);
    }

    #[test]
    fn finds_nested_packages() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("package.json"), "{}").unwrap();
        fs::create_dir_all(dir.path().join("node_modules/dep")).unwrap();
        fs::write(dir.path().join("node_modules/dep/package.json"), "{}").unwrap();

        let packages = find_packages(dir.path()).unwrap();
        assert_eq!(packages.len(), 2);
        assert_eq!(packages[0], dir.path());
        assert_eq!(packages[1], dir.path().join("node_modules/dep"));
    }
}
