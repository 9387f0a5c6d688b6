//! Dependency graph consistency check
//!
//! Builds the required-by index (dependency name -> manifests that declare
//! it) in one pass over the successfully parsed corpus, then reports every
//! dependency name that never corresponds to a parsed manifest. Runs once
//! per run, after all individual validations, because it needs global
//! visibility.

use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::manifest::Manifest;

/// A declared dependency that does not resolve to any manifest in the
/// corpus, together with every manifest that requires it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyError {
    /// Name of the dangling dependency.
    pub dependency: String,
    /// Requesters, in first-seen order during the corpus pass.
    pub required_by: Vec<String>,
}

impl fmt::Display for DependencyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} extension is not found. It is required by extension: {}.",
            self.dependency,
            self.required_by.join(", ")
        )
    }
}

/// Cross-check the declared dependency graph of a corpus.
///
/// Every dependency name that appears only as a target (never as a parsed
/// manifest) yields exactly one error carrying the full requester list.
/// A manifest depending on itself is not specially rejected: the name
/// resolves because the manifest exists.
pub fn validate<'a, I>(manifests: I) -> Vec<DependencyError>
where
    I: IntoIterator<Item = &'a Manifest>,
{
    let manifests: Vec<&Manifest> = manifests.into_iter().collect();
    let available: HashSet<&str> = manifests.iter().map(|m| m.name()).collect();

    // Required-by index, preserving first-seen order of dependency names.
    let mut order: Vec<&str> = Vec::new();
    let mut required_by: HashMap<&str, Vec<&str>> = HashMap::new();
    for manifest in &manifests {
        for dependency in manifest.depends() {
            let requesters = required_by.entry(dependency.as_str()).or_insert_with(|| {
                order.push(dependency.as_str());
                Vec::new()
            });
            if !requesters.contains(&manifest.name()) {
                requesters.push(manifest.name());
            }
        }
    }
    tracing::debug!(extensions = manifests.len(), "checked dependency graph");

    order
        .into_iter()
        .filter(|dependency| !available.contains(dependency))
        .map(|dependency| DependencyError {
            dependency: dependency.to_string(),
            required_by: required_by
                .get(dependency)
                .map(|requesters| requesters.iter().map(|r| r.to_string()).collect())
                .unwrap_or_default(),
        })
        .collect()
}
