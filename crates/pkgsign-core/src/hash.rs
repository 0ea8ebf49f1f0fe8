//! File hashing and IO primitives.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha512};
use thiserror::Error;

/// Error raised when a file cannot be read or hashed.
#[derive(Debug, Error)]
#[error("failed to read {path}: {source}")]
pub struct FileReadError {
    /// Path of the file that could not be read.
    pub path: PathBuf,
    /// Underlying IO error.
    #[source]
    pub source: io::Error,
}

impl FileReadError {
    fn new(path: &Path, source: io::Error) -> Self {
        Self {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Read an entire file as UTF-8.
///
/// # Errors
///
/// Returns [`FileReadError`] if the file cannot be read or is not valid UTF-8.
pub fn read_file_utf8(path: &Path) -> Result<String, FileReadError> {
    std::fs::read_to_string(path).map_err(|source| FileReadError::new(path, source))
}

/// Compute the lowercase hex SHA-512 of a file, streamed from disk.
///
/// # Errors
///
/// Returns [`FileReadError`] if the file cannot be opened or read.
pub fn sha512_file(path: &Path) -> Result<String, FileReadError> {
    let mut file = File::open(path).map_err(|source| FileReadError::new(path, source))?;
    let mut hasher = Sha512::new();
    io::copy(&mut file, &mut hasher).map_err(|source| FileReadError::new(path, source))?;
    Ok(hex::encode(hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn sha512_matches_known_digest() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.txt");
        fs::write(&path, "hi").unwrap();
        assert_eq!(
            sha512_file(&path).unwrap(),
            "150a14ed5bea6cc731cf86c41566ac427a8db48ef1b9fd626664b3bfbb99071f\
             a4c922f33dde38719b8c8354e2b7ab9d77e0e67fc12843920a712e73d558e197"
        );
    }

    #[test]
    fn missing_file_error_carries_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("absent.txt");
        let err = sha512_file(&path).unwrap_err();
        assert_eq!(err.path, path);
    }

    #[test]
    fn read_file_utf8_roundtrips() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("note.txt");
        fs::write(&path, "héllo").unwrap();
        assert_eq!(read_file_utf8(&path).unwrap(), "héllo");
    }
}
