//! Repository inspection collaborator interface
//!
//! The engine never clones anything itself; a collaborator makes repository
//! contents available through this narrow interface and the repository-backed
//! rules consume the snapshot.

use serde::{Deserialize, Serialize};

/// File name of the build descriptor read at the repository root.
pub const BUILD_DESCRIPTOR: &str = "CMakeLists.txt";

/// Conventional license file names probed at the repository root, in order.
pub const LICENSE_FILE_NAMES: &[&str] =
    &["LICENSE", "LICENSE.txt", "LICENSE.md", "COPYING", "COPYING.txt"];

/// What the engine sees of a fetched repository: the root file listing and
/// the build descriptor contents, nothing more.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositorySnapshot {
    /// Entry names at the repository root.
    pub files: Vec<String>,
    /// Contents of the build descriptor, when one exists at the root.
    pub build_descriptor: Option<String>,
}

impl RepositorySnapshot {
    /// Whether the repository root contains an entry named `name`.
    pub fn has_file(&self, name: &str) -> bool {
        self.files.iter().any(|f| f == name)
    }
}

/// Failure to make repository contents available.
///
/// Recoverable at the manifest level: it degrades the repository-backed
/// rules for that manifest to failures and never aborts the run.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InspectError {
    #[error("clone of '{url}' timed out after {seconds}s")]
    Timeout { url: String, seconds: u64 },

    #[error("clone of '{url}' failed: {details}")]
    CloneFailed { url: String, details: String },

    #[error("git executable not found on PATH")]
    GitUnavailable,
}

/// Collaborator that fetches a repository's working tree for inspection.
///
/// Implementations are shared read-only across validation workers.
pub trait RepositoryInspector: Send + Sync {
    /// Fetch `scm_url` (optionally pinned to `scm_revision`) and summarize
    /// its root contents.
    fn inspect(
        &self,
        scm_url: &str,
        scm_revision: Option<&str>,
    ) -> Result<RepositorySnapshot, InspectError>;
}
