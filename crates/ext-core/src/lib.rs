//! Validation and dependency-consistency engine for the extensions index
//!
//! Validates a corpus of extension manifest records against structural and
//! policy rules and cross-checks the declared inter-extension dependency
//! graph. Makes a single pass over an in-memory corpus; no state persists
//! between runs.
//!
//! Failures are always values, never panics: parse failures, rule failures,
//! dependency errors, and collaborator errors are collected into one typed
//! [`report::Report`], whose total failure count drives the exit code.

pub mod graph;
pub mod manifest;
pub mod orchestrator;
pub mod policy;
pub mod report;
pub mod repository;
pub mod rules;

pub use graph::DependencyError;
pub use manifest::{Field, Manifest, ManifestKey, ParseFailure, Presence};
pub use orchestrator::{CandidateResult, ManifestCandidate, Orchestrator, DEFAULT_POOL_SIZE};
pub use policy::ValidationPolicy;
pub use report::{CategoryTally, ManifestEntry, Report, StructuralError};
pub use repository::{
    InspectError, RepositoryInspector, RepositorySnapshot, BUILD_DESCRIPTOR, LICENSE_FILE_NAMES,
};
pub use rules::{Rule, RuleCategory, RuleContext, RuleOutcome, RuleRegistry};
