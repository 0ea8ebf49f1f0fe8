//! Extracts a gzip-compressed registry tarball into a target directory.

use std::fs::File;
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use log::debug;

use crate::error::PackError;

/// Top-level directory npm places package contents under inside a tarball.
const NPM_PACKAGE_ROOT: &str = "package";

/// Unpack a `.tgz` registry tarball into `dest_dir`.
///
/// The destination directory is created if it does not exist. Existing files
/// in `dest_dir` are overwritten.
///
/// # Errors
///
/// Returns [`PackError::Io`] on any I/O or decompression failure.
pub fn unpack_tarball(tarball_path: &Path, dest_dir: &Path) -> Result<(), PackError> {
    std::fs::create_dir_all(dest_dir)?;
    let file = File::open(tarball_path)?;
    let decoder = GzDecoder::new(file);
    let mut archive = tar::Archive::new(decoder);

    for entry in archive.entries()? {
        let mut entry = entry?;
        let path = entry.path()?.to_path_buf();
        debug!("unpacking: {}", path.display());
        entry.unpack_in(dest_dir)?;
    }

    Ok(())
}

/// Unpack a registry tarball and return the package root inside it.
///
/// Registry tarballs nest the package under a top-level `package/`
/// directory; this resolves and returns that directory so verification can
/// run over package-relative paths.
///
/// # Errors
///
/// Returns [`PackError::Io`] on extraction failure and
/// [`PackError::MissingPackageRoot`] if the archive holds no `package/`
/// directory.
pub fn unpack_package(tarball_path: &Path, dest_dir: &Path) -> Result<PathBuf, PackError> {
    unpack_tarball(tarball_path, dest_dir)?;
    let root = dest_dir.join(NPM_PACKAGE_ROOT);
    if !root.is_dir() {
        return Err(PackError::MissingPackageRoot(NPM_PACKAGE_ROOT.to_owned()));
    }
    Ok(root)
}
