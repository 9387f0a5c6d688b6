//! Clone-with-timeout repository inspection
//!
//! Implements the engine's `RepositoryInspector` interface by driving the
//! `git` executable: a shallow clone bounded by a short timeout, plus a
//! fetch/checkout of the pinned revision bounded by a longer one. The
//! working tree lives in a scoped temporary directory that is removed on
//! every exit path, including timeout; removal failures are logged, never
//! escalated.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};

use ext_core::{InspectError, RepositoryInspector, RepositorySnapshot, BUILD_DESCRIPTOR};

/// Bound on the shallow clone of the default branch.
pub const DEFAULT_CLONE_TIMEOUT: Duration = Duration::from_secs(30);

/// Bound on fetching and checking out a pinned revision.
pub const DEFAULT_CHECKOUT_TIMEOUT: Duration = Duration::from_secs(120);

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Repository inspector backed by the `git` CLI.
#[derive(Debug, Clone)]
pub struct GitInspector {
    git_program: PathBuf,
    clone_timeout: Duration,
    checkout_timeout: Duration,
}

impl Default for GitInspector {
    fn default() -> Self {
        Self::new()
    }
}

impl GitInspector {
    /// Inspector with the default timeouts, using `git` from `PATH`.
    pub fn new() -> Self {
        Self {
            git_program: PathBuf::from("git"),
            clone_timeout: DEFAULT_CLONE_TIMEOUT,
            checkout_timeout: DEFAULT_CHECKOUT_TIMEOUT,
        }
    }

    /// Override the clone and revision-checkout timeouts.
    pub fn with_timeouts(mut self, clone_timeout: Duration, checkout_timeout: Duration) -> Self {
        self.clone_timeout = clone_timeout;
        self.checkout_timeout = checkout_timeout;
        self
    }

    /// Override the git executable (used by tests to simulate a missing or
    /// hung tool).
    pub fn with_git_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.git_program = program.into();
        self
    }

    fn inspect_at(
        &self,
        workdir: &Path,
        url: &str,
        revision: Option<&str>,
    ) -> Result<RepositorySnapshot, InspectError> {
        self.run_git(
            &["clone", "--quiet", "--depth", "1", url, "."],
            workdir,
            self.clone_timeout,
            url,
        )?;
        if let Some(revision) = revision {
            self.run_git(
                &["fetch", "--quiet", "--depth", "1", "origin", revision],
                workdir,
                self.checkout_timeout,
                url,
            )?;
            self.run_git(
                &["checkout", "--quiet", "FETCH_HEAD"],
                workdir,
                self.checkout_timeout,
                url,
            )?;
        }
        snapshot_of(workdir, url)
    }

    fn run_git(
        &self,
        args: &[&str],
        cwd: &Path,
        timeout: Duration,
        url: &str,
    ) -> Result<(), InspectError> {
        tracing::debug!(?args, cwd = %cwd.display(), "running git");
        let mut child = Command::new(&self.git_program)
            .args(args)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|err| match err.kind() {
                std::io::ErrorKind::NotFound => InspectError::GitUnavailable,
                _ => InspectError::CloneFailed {
                    url: url.to_string(),
                    details: err.to_string(),
                },
            })?;

        let started = Instant::now();
        loop {
            match child.try_wait() {
                Ok(Some(status)) if status.success() => return Ok(()),
                Ok(Some(status)) => {
                    let details = read_stderr(&mut child);
                    return Err(InspectError::CloneFailed {
                        url: url.to_string(),
                        details: if details.is_empty() {
                            format!("git {} exited with {status}", args[0])
                        } else {
                            details
                        },
                    });
                }
                Ok(None) if started.elapsed() >= timeout => {
                    kill_child(&mut child);
                    return Err(InspectError::Timeout {
                        url: url.to_string(),
                        seconds: timeout.as_secs(),
                    });
                }
                Ok(None) => std::thread::sleep(POLL_INTERVAL),
                Err(err) => {
                    kill_child(&mut child);
                    return Err(InspectError::CloneFailed {
                        url: url.to_string(),
                        details: err.to_string(),
                    });
                }
            }
        }
    }
}

impl RepositoryInspector for GitInspector {
    fn inspect(
        &self,
        scm_url: &str,
        scm_revision: Option<&str>,
    ) -> Result<RepositorySnapshot, InspectError> {
        let workdir = tempfile::tempdir().map_err(|err| InspectError::CloneFailed {
            url: scm_url.to_string(),
            details: format!("failed to create temporary directory: {err}"),
        })?;
        let result = self.inspect_at(workdir.path(), scm_url, scm_revision);
        if let Err(err) = workdir.close() {
            tracing::warn!("failed to remove temporary clone directory: {err}");
        }
        result
    }
}

/// Summarize the working tree root: entry names plus the build descriptor
/// contents when one exists.
fn snapshot_of(workdir: &Path, url: &str) -> Result<RepositorySnapshot, InspectError> {
    let read_failed = |err: std::io::Error| InspectError::CloneFailed {
        url: url.to_string(),
        details: format!("failed to read cloned repository: {err}"),
    };
    let mut files = Vec::new();
    for entry in std::fs::read_dir(workdir).map_err(read_failed)? {
        let entry = entry.map_err(read_failed)?;
        files.push(entry.file_name().to_string_lossy().into_owned());
    }
    files.sort();
    let build_descriptor = match std::fs::read_to_string(workdir.join(BUILD_DESCRIPTOR)) {
        Ok(text) => Some(text),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => None,
        Err(err) => return Err(read_failed(err)),
    };
    Ok(RepositorySnapshot {
        files,
        build_descriptor,
    })
}

/// git runs with `--quiet`, so the pipe buffer never fills before exit and
/// stderr can be drained after the fact.
fn read_stderr(child: &mut Child) -> String {
    let mut details = String::new();
    if let Some(stderr) = child.stderr.as_mut() {
        let _ = stderr.read_to_string(&mut details);
    }
    details.trim().to_string()
}

fn kill_child(child: &mut Child) {
    if let Err(err) = child.kill() {
        tracing::warn!("failed to kill git process: {err}");
    }
    // Reap the process so no zombie outlives the inspection.
    let _ = child.wait();
}
