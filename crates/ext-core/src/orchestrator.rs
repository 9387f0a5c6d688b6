//! Bounded-concurrency validation of many candidates
//!
//! Fans candidate manifests out to a fixed pool of workers, each running
//! parse -> repository inspection (when enabled) -> rule evaluation, and
//! merges the results back in input order. Workers share only the read-only
//! registry, policy, and inspector; results travel over a channel and the
//! orchestrator alone owns the collection, so the fan-out needs no locks.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::thread;

use crate::manifest::Manifest;
use crate::repository::{InspectError, RepositoryInspector, RepositorySnapshot};
use crate::rules::{RuleContext, RuleOutcome, RuleRegistry};

/// Default number of parallel validation workers.
pub const DEFAULT_POOL_SIZE: usize = 6;

#[derive(Debug, Clone)]
enum CandidateSource {
    Text(String),
    /// The collaborator could not supply the source text; carried through so
    /// the entry keeps its slot in the output ordering.
    Unavailable(String),
}

/// One candidate description to validate.
#[derive(Debug, Clone)]
pub struct ManifestCandidate {
    /// Name derived from the source file stem.
    pub name: String,
    source: CandidateSource,
}

impl ManifestCandidate {
    /// Candidate with its raw description text.
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: CandidateSource::Text(text.into()),
        }
    }

    /// Candidate whose source text could not be read; `reason` becomes its
    /// single failure.
    pub fn unavailable(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: CandidateSource::Unavailable(reason.into()),
        }
    }
}

/// Validation result for one candidate.
#[derive(Debug, Clone)]
pub struct CandidateResult {
    /// Candidate name.
    pub name: String,
    /// The parsed manifest; `None` when parsing failed or the source was
    /// unavailable.
    pub manifest: Option<Manifest>,
    /// Every rule outcome, in evaluation order. Empty when rules never ran.
    pub outcomes: Vec<RuleOutcome>,
    /// Failure messages with duplicates coalesced, first-seen order.
    pub failures: Vec<String>,
}

/// Runs the parse-then-rule pipeline over a candidate set with bounded
/// parallelism.
pub struct Orchestrator<'a> {
    registry: &'a RuleRegistry,
    inspector: Option<&'a dyn RepositoryInspector>,
    pool_size: usize,
}

impl<'a> Orchestrator<'a> {
    /// Orchestrator over `registry` with the default pool size.
    pub fn new(registry: &'a RuleRegistry) -> Self {
        Self {
            registry,
            inspector: None,
            pool_size: DEFAULT_POOL_SIZE,
        }
    }

    /// Attach the repository inspection collaborator.
    pub fn with_inspector(mut self, inspector: &'a dyn RepositoryInspector) -> Self {
        self.inspector = Some(inspector);
        self
    }

    /// Override the worker pool size (minimum 1).
    pub fn with_pool_size(mut self, pool_size: usize) -> Self {
        self.pool_size = pool_size.max(1);
        self
    }

    /// Validate every candidate and return results in input order,
    /// independent of worker completion order.
    pub fn run(&self, candidates: &[ManifestCandidate]) -> Vec<CandidateResult> {
        if candidates.is_empty() {
            return Vec::new();
        }
        let workers = self.pool_size.min(candidates.len());
        tracing::debug!(
            candidates = candidates.len(),
            workers,
            "validating extension descriptions"
        );
        if workers == 1 {
            return candidates.iter().map(|c| self.validate_candidate(c)).collect();
        }

        let cursor = AtomicUsize::new(0);
        let (tx, rx) = mpsc::channel::<(usize, CandidateResult)>();
        let mut indexed: Vec<(usize, CandidateResult)> = Vec::with_capacity(candidates.len());
        thread::scope(|scope| {
            for _ in 0..workers {
                let tx = tx.clone();
                let cursor = &cursor;
                scope.spawn(move || {
                    loop {
                        let index = cursor.fetch_add(1, Ordering::Relaxed);
                        if index >= candidates.len() {
                            break;
                        }
                        let result = self.validate_candidate(&candidates[index]);
                        if tx.send((index, result)).is_err() {
                            break;
                        }
                    }
                });
            }
            drop(tx);
            // Only this thread touches the collection; workers hand results
            // over the channel and never share mutable state.
            for item in rx {
                indexed.push(item);
            }
        });
        indexed.sort_by_key(|(index, _)| *index);
        indexed.into_iter().map(|(_, result)| result).collect()
    }

    fn validate_candidate(&self, candidate: &ManifestCandidate) -> CandidateResult {
        let text = match &candidate.source {
            CandidateSource::Unavailable(reason) => {
                return CandidateResult {
                    name: candidate.name.clone(),
                    manifest: None,
                    outcomes: Vec::new(),
                    failures: vec![reason.clone()],
                };
            }
            CandidateSource::Text(text) => text,
        };

        let manifest = match Manifest::parse(&candidate.name, text) {
            Ok(manifest) => manifest,
            Err(failure) => {
                return CandidateResult {
                    name: candidate.name.clone(),
                    manifest: None,
                    outcomes: Vec::new(),
                    failures: vec![failure.to_string()],
                };
            }
        };

        let inspection: Option<Result<RepositorySnapshot, InspectError>> =
            match (self.registry.needs_repository(), self.inspector, manifest.scm_url()) {
                (true, Some(inspector), Some(url)) => {
                    Some(inspector.inspect(url, manifest.scm_revision()))
                }
                _ => None,
            };
        let ctx = match inspection.as_ref() {
            Some(outcome) => RuleContext::with_repository(outcome),
            None => RuleContext::empty(),
        };

        let outcomes = self.registry.evaluate(&manifest, &ctx);
        let failures = coalesce(outcomes.iter().filter_map(|o| o.message.clone()));
        CandidateResult {
            name: candidate.name.clone(),
            manifest: Some(manifest),
            outcomes,
            failures,
        }
    }
}

/// Drop duplicate messages while preserving first-seen order.
fn coalesce<I: IntoIterator<Item = String>>(messages: I) -> Vec<String> {
    let mut seen = HashSet::new();
    messages
        .into_iter()
        .filter(|message| seen.insert(message.clone()))
        .collect()
}
