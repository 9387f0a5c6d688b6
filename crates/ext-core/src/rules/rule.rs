//! Rule type and evaluation outcome
//!
//! A `Rule` holds introspectable metadata (id, category, required keys) plus
//! a body closure. The precondition list generalizes the
//! require-key-before-body guard: the engine checks every required key and
//! short-circuits with a "key is missing" / "value is not set" failure
//! before the body runs, so bodies can assume their keys exist.

use serde::{Deserialize, Serialize};

use crate::manifest::{Manifest, ManifestKey, Presence};
use crate::repository::{InspectError, RepositorySnapshot};

/// Rule classification, carried on every outcome.
///
/// Report grouping and the per-check tally use this tag directly instead of
/// matching on diagnostic text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RuleCategory {
    Category,
    ScmUrl,
    RepositoryName,
    RepositoryContent,
}

impl RuleCategory {
    /// All categories, in report ordering.
    pub const ALL: [RuleCategory; 4] = [
        RuleCategory::Category,
        RuleCategory::ScmUrl,
        RuleCategory::RepositoryName,
        RuleCategory::RepositoryContent,
    ];

    /// Short label used in structured output.
    pub fn label(&self) -> &'static str {
        match self {
            RuleCategory::Category => "category",
            RuleCategory::ScmUrl => "scm-url",
            RuleCategory::RepositoryName => "repository-name",
            RuleCategory::RepositoryContent => "repository-content",
        }
    }
}

/// Result of applying one rule to one manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleOutcome {
    /// Identifier of the rule that produced this outcome.
    pub rule: String,
    /// Category tag of the rule.
    pub category: RuleCategory,
    /// Diagnostic message; `None` means the rule passed.
    pub message: Option<String>,
}

impl RuleOutcome {
    /// A passing outcome.
    pub fn pass(rule: &str, category: RuleCategory) -> Self {
        Self {
            rule: rule.to_string(),
            category,
            message: None,
        }
    }

    /// A failing outcome with a diagnostic.
    pub fn fail(rule: &str, category: RuleCategory, message: impl Into<String>) -> Self {
        Self {
            rule: rule.to_string(),
            category,
            message: Some(message.into()),
        }
    }

    /// Whether the rule passed.
    pub fn passed(&self) -> bool {
        self.message.is_none()
    }
}

/// Auxiliary context supplied by collaborators for one manifest.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleContext<'a> {
    /// Outcome of the repository inspection for this manifest, when the run
    /// carries repository-backed rules and the manifest has an `scm_url`.
    pub repository: Option<&'a Result<RepositorySnapshot, InspectError>>,
}

impl<'a> RuleContext<'a> {
    /// Context with no collaborator resources.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Context carrying a repository inspection outcome.
    pub fn with_repository(outcome: &'a Result<RepositorySnapshot, InspectError>) -> Self {
        Self {
            repository: Some(outcome),
        }
    }
}

type RuleBody = Box<dyn Fn(&Manifest, &RuleContext<'_>) -> Result<(), String> + Send + Sync>;

/// A named, pure check over a manifest.
pub struct Rule {
    id: &'static str,
    category: RuleCategory,
    requires: Vec<ManifestKey>,
    body: RuleBody,
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule")
            .field("id", &self.id)
            .field("category", &self.category)
            .field("requires", &self.requires)
            .finish_non_exhaustive()
    }
}

impl Rule {
    /// Create a rule from its metadata and body.
    pub fn new(
        id: &'static str,
        category: RuleCategory,
        requires: Vec<ManifestKey>,
        body: impl Fn(&Manifest, &RuleContext<'_>) -> Result<(), String> + Send + Sync + 'static,
    ) -> Self {
        Self {
            id,
            category,
            requires,
            body: Box::new(body),
        }
    }

    /// Rule identifier.
    pub fn id(&self) -> &'static str {
        self.id
    }

    /// Category tag.
    pub fn category(&self) -> RuleCategory {
        self.category
    }

    /// Metadata keys the body requires.
    pub fn requires(&self) -> &[ManifestKey] {
        &self.requires
    }

    /// Apply this rule to a manifest.
    ///
    /// Preconditions run first; absence of required metadata is itself a
    /// violation, never a skip. Failure is always a typed outcome.
    pub fn evaluate(&self, manifest: &Manifest, ctx: &RuleContext<'_>) -> RuleOutcome {
        for key in &self.requires {
            match manifest.presence(*key) {
                Presence::Missing => {
                    return RuleOutcome::fail(
                        self.id,
                        self.category,
                        format!("{} key is missing", key.as_str()),
                    );
                }
                Presence::Unset => {
                    return RuleOutcome::fail(
                        self.id,
                        self.category,
                        format!("{} value is not set", key.as_str()),
                    );
                }
                Presence::Present => {}
            }
        }
        match (self.body)(manifest, ctx) {
            Ok(()) => RuleOutcome::pass(self.id, self.category),
            Err(message) => RuleOutcome::fail(self.id, self.category, message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn manifest(text: &str) -> Manifest {
        Manifest::parse("Test", text).unwrap()
    }

    fn always_pass() -> Rule {
        Rule::new(
            "always-pass",
            RuleCategory::Category,
            vec![ManifestKey::Category],
            |_, _| Ok(()),
        )
    }

    #[test]
    fn missing_key_short_circuits_body() {
        let rule = Rule::new(
            "boom",
            RuleCategory::Category,
            vec![ManifestKey::Category],
            |_, _| Err("body must not run".to_string()),
        );
        let outcome = rule.evaluate(&manifest("{}"), &RuleContext::empty());
        assert_eq!(outcome.message.as_deref(), Some("category key is missing"));
    }

    #[test]
    fn null_value_fails_with_value_not_set() {
        let outcome = always_pass().evaluate(
            &manifest(r#"{"category": null}"#),
            &RuleContext::empty(),
        );
        assert_eq!(outcome.message.as_deref(), Some("category value is not set"));
    }

    #[test]
    fn body_runs_when_preconditions_hold() {
        let outcome = always_pass().evaluate(
            &manifest(r#"{"category": "Examples"}"#),
            &RuleContext::empty(),
        );
        assert!(outcome.passed());
    }

    #[test]
    fn failing_body_becomes_typed_outcome() {
        let rule = Rule::new("r", RuleCategory::ScmUrl, Vec::new(), |_, _| {
            Err("nope".to_string())
        });
        let outcome = rule.evaluate(&manifest("{}"), &RuleContext::empty());
        assert_eq!(outcome.rule, "r");
        assert_eq!(outcome.category, RuleCategory::ScmUrl);
        assert_eq!(outcome.message.as_deref(), Some("nope"));
    }
}
