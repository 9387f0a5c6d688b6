//! Index layout policing
//!
//! The index root is expected to contain only description files plus a
//! small set of housekeeping files and directories. Everything else is an
//! unexpected entry, reported as a structural error independent of any
//! manifest's content.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Directories tolerated at the index root.
const ALLOWED_DIRECTORIES: &[&str] = &[
    ".circleci",
    ".git",
    ".github",
    ".idea",
    "ARCHIVE",
    "scripts",
];

/// Exact file names tolerated at the index root.
const ALLOWED_FILES: &[&str] = &[
    ".git-blame-ignore-revs",
    ".pre-commit-config.yaml",
    ".prettierrc.js",
    "README.md",
];

/// File extensions tolerated at the index root.
const ALLOWED_EXTENSIONS: &[&str] = &["json"];

/// Allow-lists consulted by the layout scan; injectable so alternate index
/// layouts can be policed with the same scan.
#[derive(Debug, Clone)]
pub struct LayoutPolicy {
    directories: BTreeSet<String>,
    files: BTreeSet<String>,
    extensions: BTreeSet<String>,
}

impl Default for LayoutPolicy {
    fn default() -> Self {
        Self {
            directories: ALLOWED_DIRECTORIES.iter().map(|d| d.to_string()).collect(),
            files: ALLOWED_FILES.iter().map(|f| f.to_string()).collect(),
            extensions: ALLOWED_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
        }
    }
}

impl LayoutPolicy {
    /// Replace the allowed directory set.
    pub fn with_directories<I, S>(mut self, directories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.directories = directories.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the allowed exact file name set.
    pub fn with_files<I, S>(mut self, files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.files = files.into_iter().map(Into::into).collect();
        self
    }

    fn allows_directory(&self, name: &str) -> bool {
        self.directories.contains(name)
    }

    fn allows_file(&self, path: &Path) -> bool {
        if let Some(name) = path.file_name() {
            if self.files.contains(&name.to_string_lossy().into_owned()) {
                return true;
            }
        }
        path.extension()
            .is_some_and(|ext| self.extensions.contains(&ext.to_string_lossy().into_owned()))
    }
}

/// Scan the index root for entries outside the policy's allow-lists.
///
/// Returns the unexpected entries relative to `root`, sorted for
/// deterministic reporting. Only the top level is inspected; allowed
/// directories are not descended into.
pub fn scan_layout(root: &Path, policy: &LayoutPolicy) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(Error::NotADirectory {
            path: root.to_path_buf(),
        });
    }
    let mut unexpected = Vec::new();
    for entry in std::fs::read_dir(root)? {
        let entry = entry?;
        let path = entry.path();
        let name = entry.file_name().to_string_lossy().into_owned();
        let allowed = if path.is_dir() {
            policy.allows_directory(&name)
        } else {
            policy.allows_file(&path)
        };
        if !allowed {
            unexpected.push(PathBuf::from(name));
        }
    }
    unexpected.sort();
    if !unexpected.is_empty() {
        tracing::debug!(count = unexpected.len(), "unexpected entries at index root");
    }
    Ok(unexpected)
}
