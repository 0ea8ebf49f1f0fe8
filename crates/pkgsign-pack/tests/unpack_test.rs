use std::fs::{self, File};

use flate2::write::GzEncoder;
use flate2::Compression;
use pkgsign_pack::error::PackError;
use pkgsign_pack::unpack::{unpack_package, unpack_tarball};
use tempfile::TempDir;

/// Build a registry-shaped tarball: contents under a top-level `package/`.
fn make_tarball(with_package_root: bool) -> (TempDir, std::path::PathBuf) {
    let src = TempDir::new().unwrap();
    let root = if with_package_root {
        let root = src.path().join("package");
        fs::create_dir(&root).unwrap();
        root
    } else {
        src.path().to_path_buf()
    };
    fs::write(root.join("package.json"), r#"{"name":"p","version":"1.0.0"}"#).unwrap();
    fs::write(root.join("index.js"), "module.exports = 42;\n").unwrap();

    let out = TempDir::new().unwrap();
    let tarball = out.path().join("p-1.0.0.tgz");
    let encoder = GzEncoder::new(File::create(&tarball).unwrap(), Compression::default());
    let mut archive = tar::Builder::new(encoder);
    archive.append_dir_all(if with_package_root { "package" } else { "." }, &root).unwrap();
    archive.finish().unwrap();
    drop(archive);

    (out, tarball)
}

#[test]
fn unpack_roundtrips_file_contents() {
    let (_keep, tarball) = make_tarball(true);
    let dest = TempDir::new().unwrap();
    unpack_tarball(&tarball, dest.path()).unwrap();

    let manifest = fs::read_to_string(dest.path().join("package/package.json")).unwrap();
    assert!(manifest.contains(r#""name":"p""#));
    let index = fs::read_to_string(dest.path().join("package/index.js")).unwrap();
    assert_eq!(index, "module.exports = 42;\n");
}

#[test]
fn unpack_package_resolves_the_package_root() {
    let (_keep, tarball) = make_tarball(true);
    let dest = TempDir::new().unwrap();
    let root = unpack_package(&tarball, dest.path()).unwrap();
    assert!(root.ends_with("package"));
    assert!(root.join("package.json").exists());
}

#[test]
fn archive_without_package_root_is_rejected() {
    let (_keep, tarball) = make_tarball(false);
    let dest = TempDir::new().unwrap();
    let err = unpack_package(&tarball, dest.path()).unwrap_err();
    assert!(matches!(err, PackError::MissingPackageRoot(_)));
}

#[test]
fn missing_tarball_is_an_io_error() {
    let dest = TempDir::new().unwrap();
    let err = unpack_tarball(&dest.path().join("absent.tgz"), dest.path()).unwrap_err();
    assert!(matches!(err, PackError::Io(_)));
}
