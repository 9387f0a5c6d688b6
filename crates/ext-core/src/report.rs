//! Aggregated validation report
//!
//! Merges per-manifest rule outcomes, dependency errors, and structural
//! errors contributed by collaborators into one typed report. Construction
//! never fails; an empty corpus yields an all-pass report. The total
//! failure count is the single source of truth for the process exit code.

use serde::{Deserialize, Serialize};

use crate::graph::DependencyError;
use crate::orchestrator::CandidateResult;
use crate::rules::{RuleCategory, RuleOutcome};

/// Collaborator-reported problem with the index layout itself, independent
/// of any manifest's content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuralError {
    /// Offending entry, relative to the index root.
    pub path: String,
}

impl std::fmt::Display for StructuralError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unexpected file or directory: {}", self.path)
    }
}

/// Report entry for one candidate manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    /// Candidate name.
    pub name: String,
    /// The manifest's source-control URL, when it parsed and carried one.
    pub scm_url: Option<String>,
    /// Full rule outcome list, kept for diagnostics.
    pub outcomes: Vec<RuleOutcome>,
    /// Coalesced failure messages; the summary retains only these.
    pub failures: Vec<String>,
}

impl ManifestEntry {
    fn from_result(result: CandidateResult) -> Self {
        Self {
            scm_url: result
                .manifest
                .as_ref()
                .and_then(|m| m.scm_url())
                .map(str::to_string),
            name: result.name,
            outcomes: result.outcomes,
            failures: result.failures,
        }
    }

    /// Whether any failure was recorded for this entry.
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    /// Whether any outcome in `category` failed.
    pub fn failed_in(&self, category: RuleCategory) -> bool {
        self.outcomes
            .iter()
            .any(|o| o.category == category && !o.passed())
    }

    /// Failure messages of outcomes in `category`, coalesced order kept.
    pub fn failures_in(&self, category: RuleCategory) -> Vec<&str> {
        self.failures
            .iter()
            .map(String::as_str)
            .filter(|message| {
                self.outcomes
                    .iter()
                    .any(|o| o.category == category && o.message.as_deref() == Some(message))
            })
            .collect()
    }

    /// Failure messages not tied to any rule outcome (parse failures,
    /// unreadable sources).
    pub fn other_failures(&self) -> Vec<&str> {
        self.failures
            .iter()
            .map(String::as_str)
            .filter(|message| {
                !self
                    .outcomes
                    .iter()
                    .any(|o| o.message.as_deref() == Some(message))
            })
            .collect()
    }
}

/// Pass/fail counts of one rule category across the corpus.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTally {
    pub pass: usize,
    pub fail: usize,
}

/// Aggregate of one validation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    /// Per-manifest entries, in input order.
    pub entries: Vec<ManifestEntry>,
    /// Dangling-dependency errors from the graph check.
    pub dependency_errors: Vec<DependencyError>,
    /// Layout problems reported by the filesystem collaborator.
    pub structural_errors: Vec<StructuralError>,
}

impl Report {
    /// Merge per-manifest results and collaborator errors into a report.
    /// Deterministic: identical inputs yield identical reports.
    pub fn build(
        results: Vec<CandidateResult>,
        dependency_errors: Vec<DependencyError>,
        structural_errors: Vec<StructuralError>,
    ) -> Self {
        Self {
            entries: results.into_iter().map(ManifestEntry::from_result).collect(),
            dependency_errors,
            structural_errors,
        }
    }

    /// Sum of per-manifest failures (after coalescing), dependency errors,
    /// and structural errors. Drives the exit code; no double counting.
    pub fn total_failures(&self) -> usize {
        self.manifest_failures() + self.dependency_errors.len() + self.structural_errors.len()
    }

    /// Per-manifest failure count across the corpus.
    pub fn manifest_failures(&self) -> usize {
        self.entries.iter().map(|e| e.failures.len()).sum()
    }

    /// Number of entries with at least one failure.
    pub fn entries_with_failures(&self) -> usize {
        self.entries.iter().filter(|e| e.has_failures()).count()
    }

    /// Whether the run is clean.
    pub fn is_clean(&self) -> bool {
        self.total_failures() == 0
    }

    /// Whether any entry carries an outcome in `category`, i.e. the
    /// corresponding rules actually ran this run.
    pub fn has_category(&self, category: RuleCategory) -> bool {
        self.entries
            .iter()
            .any(|e| e.outcomes.iter().any(|o| o.category == category))
    }

    /// Per-entry pass/fail tally for one rule category: an entry counts as
    /// failed when any of the category's outcomes failed for it.
    pub fn category_tally(&self, category: RuleCategory) -> CategoryTally {
        let mut tally = CategoryTally::default();
        for entry in &self.entries {
            if entry.failed_in(category) {
                tally.fail += 1;
            } else {
                tally.pass += 1;
            }
        }
        tally
    }
}
