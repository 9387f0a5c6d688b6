//! Corpus discovery
//!
//! Candidate manifests are the `.json` files at the index root. The
//! extension name is derived from the file stem, never from the content.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Whether `path` names an extension description file (`.json`).
pub fn is_manifest_file(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "json")
}

/// Extension name derived from the file stem.
pub fn manifest_name(path: &Path) -> Option<String> {
    path.file_stem().map(|stem| stem.to_string_lossy().into_owned())
}

/// List the description files of a corpus directory, sorted by file name
/// for deterministic ordering.
pub fn discover_manifests(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(Error::NotADirectory {
            path: dir.to_path_buf(),
        });
    }
    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && is_manifest_file(&path) {
            paths.push(path);
        }
    }
    paths.sort();
    tracing::debug!(count = paths.len(), dir = %dir.display(), "discovered description files");
    Ok(paths)
}
