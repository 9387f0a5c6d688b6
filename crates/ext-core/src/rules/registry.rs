//! Built-in rule set and evaluation order
//!
//! The registry owns the rules for a run and evaluates them in a stable
//! order. Order has no semantic effect (rules are independent) but keeps
//! report ordering deterministic.

use std::path::Path;
use std::sync::{Arc, LazyLock};

use regex::Regex;

use crate::manifest::{Manifest, ManifestKey};
use crate::policy::ValidationPolicy;
use crate::repository::{RepositorySnapshot, BUILD_DESCRIPTOR, LICENSE_FILE_NAMES};
use crate::rules::rule::{Rule, RuleCategory, RuleContext, RuleOutcome};

/// URL schemes accepted by the scm_url syntax check.
const SUPPORTED_SCHEMES: &[&str] = &["git", "https"];

/// Prefixes suggested when a repository name misses the naming convention.
const NAMING_PREFIXES: &[&str] = &["Slicer-", "Slicer_", "SlicerExtension-", "SlicerExtension_"];

static PROJECT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)project\s*\(\s*([^\s()]+)").expect("Invalid project declaration regex")
});

/// The rule set applied to every manifest of a run.
#[derive(Debug)]
pub struct RuleRegistry {
    rules: Vec<Rule>,
}

impl RuleRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// The content rules every run carries: category membership, scm_url
    /// syntax, and the repository naming convention.
    pub fn default_rules(policy: ValidationPolicy) -> Self {
        let policy = Arc::new(policy);
        let mut registry = Self::new();
        registry.register(category_rule(Arc::clone(&policy)));
        registry.register(scm_url_syntax_rule());
        registry.register(repository_name_rule(policy));
        registry
    }

    /// The default rules plus the repository-backed checks (build descriptor
    /// project name, license presence). Requires a repository inspector at
    /// orchestration time; without one the added rules fail as unavailable.
    pub fn with_repository_rules(policy: ValidationPolicy) -> Self {
        let mut registry = Self::default_rules(policy);
        registry.register(build_descriptor_rule());
        registry.register(license_rule());
        registry
    }

    /// Append a rule to the evaluation order.
    pub fn register(&mut self, rule: Rule) {
        self.rules.push(rule);
    }

    /// All registered rules, in evaluation order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Whether any registered rule consumes a repository snapshot.
    pub fn needs_repository(&self) -> bool {
        self.rules
            .iter()
            .any(|r| r.category() == RuleCategory::RepositoryContent)
    }

    /// Apply every rule to `manifest`, in order.
    pub fn evaluate(&self, manifest: &Manifest, ctx: &RuleContext<'_>) -> Vec<RuleOutcome> {
        self.rules
            .iter()
            .map(|rule| rule.evaluate(manifest, ctx))
            .collect()
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::default_rules(ValidationPolicy::default())
    }
}

fn category_rule(policy: Arc<ValidationPolicy>) -> Rule {
    Rule::new(
        "check-category",
        RuleCategory::Category,
        vec![ManifestKey::Category],
        move |manifest, _ctx| {
            let category = manifest.category().unwrap_or_default();
            if policy.allows_category(category) {
                Ok(())
            } else {
                Err(format!(
                    "category is '{category}' but it should be any of: {}",
                    policy.categories_hint()
                ))
            }
        },
    )
}

fn scm_url_syntax_rule() -> Rule {
    Rule::new(
        "check-scm-url-syntax",
        RuleCategory::ScmUrl,
        vec![ManifestKey::ScmUrl],
        |manifest, _ctx| {
            let url = manifest.scm_url().unwrap_or_default();
            let Some((scheme, _)) = url.split_once("://") else {
                return Err("scm_url does not match scheme://host/path".to_string());
            };
            if !SUPPORTED_SCHEMES.contains(&scheme) {
                return Err(format!(
                    "scm_url scheme is '{scheme}' but it should be any of {SUPPORTED_SCHEMES:?}"
                ));
            }
            Ok(())
        },
    )
}

fn repository_name_rule(policy: Arc<ValidationPolicy>) -> Rule {
    Rule::new(
        "check-repository-name",
        RuleCategory::RepositoryName,
        vec![ManifestKey::ScmUrl],
        move |manifest, _ctx| {
            let repo_name = repository_short_name(manifest.scm_url().unwrap_or_default());
            if policy.is_repository_name_exception(&repo_name) {
                return Ok(());
            }
            if repo_name.to_lowercase().contains("slicer") {
                return Ok(());
            }
            let variations: Vec<String> = NAMING_PREFIXES
                .iter()
                .map(|prefix| format!("{prefix}{repo_name}"))
                .collect();
            Err(format!(
                "extension repository name is '{repo_name}'. Please, consider changing it to \
                 'Slicer{repo_name}' or any of these variations {variations:?}."
            ))
        },
    )
}

fn build_descriptor_rule() -> Rule {
    Rule::new(
        "check-build-descriptor",
        RuleCategory::RepositoryContent,
        vec![ManifestKey::ScmUrl],
        |manifest, ctx| {
            let snapshot = repository_snapshot(ctx)?;
            let Some(descriptor) = snapshot.build_descriptor.as_deref() else {
                return Err(format!(
                    "repository does not contain a {BUILD_DESCRIPTOR} at its root"
                ));
            };
            let Some(project) = project_name(descriptor) else {
                return Err(format!(
                    "no project() declaration found in {BUILD_DESCRIPTOR}"
                ));
            };
            if project != manifest.name() {
                return Err(format!(
                    "project name '{project}' in {BUILD_DESCRIPTOR} does not match extension \
                     name '{}'",
                    manifest.name()
                ));
            }
            Ok(())
        },
    )
}

fn license_rule() -> Rule {
    Rule::new(
        "check-license-file",
        RuleCategory::RepositoryContent,
        vec![ManifestKey::ScmUrl],
        |_manifest, ctx| {
            let snapshot = repository_snapshot(ctx)?;
            if LICENSE_FILE_NAMES.iter().any(|name| snapshot.has_file(name)) {
                Ok(())
            } else {
                Err(format!(
                    "no license file found at the repository root (looked for any of \
                     {LICENSE_FILE_NAMES:?})"
                ))
            }
        },
    )
}

/// Resolve the repository snapshot out of the rule context, degrading every
/// unavailability cause to a diagnostic instead of a panic.
fn repository_snapshot<'a>(ctx: &RuleContext<'a>) -> Result<&'a RepositorySnapshot, String> {
    match ctx.repository {
        Some(Ok(snapshot)) => Ok(snapshot),
        Some(Err(err)) => Err(format!("repository contents unavailable: {err}")),
        None => Err(
            "repository contents unavailable: no repository inspection was configured".to_string(),
        ),
    }
}

/// Short repository name: the last path segment of the URL with any trailing
/// archive extension stripped.
fn repository_short_name(url: &str) -> String {
    let tail = url.rsplit('/').next().unwrap_or(url);
    match Path::new(tail).file_stem() {
        Some(stem) => stem.to_string_lossy().into_owned(),
        None => tail.to_string(),
    }
}

/// First `project(<name> ...)` declaration of a build descriptor, quotes
/// stripped.
fn project_name(descriptor: &str) -> Option<String> {
    let captures = PROJECT_REGEX.captures(descriptor)?;
    Some(
        captures[1]
            .trim_matches(|c| c == '"' || c == '\'')
            .to_string(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InspectError;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn manifest(text: &str) -> Manifest {
        Manifest::parse("FooBar", text).unwrap()
    }

    fn failures(registry: &RuleRegistry, manifest: &Manifest) -> Vec<String> {
        registry
            .evaluate(manifest, &RuleContext::empty())
            .into_iter()
            .filter_map(|o| o.message)
            .collect()
    }

    #[test]
    fn compliant_manifest_passes_all_default_rules() {
        let registry = RuleRegistry::default();
        let manifest = manifest(
            r#"{"category": "Segmentation", "scm_url": "https://github.com/org/Slicer-FooBar"}"#,
        );
        assert!(failures(&registry, &manifest).is_empty());
    }

    #[test]
    fn unknown_category_fails_with_allow_list_hint() {
        let registry = RuleRegistry::default();
        let manifest = manifest(
            r#"{"category": "Miscellaneous", "scm_url": "https://github.com/org/Slicer-X"}"#,
        );
        let failures = failures(&registry, &manifest);
        assert_eq!(failures.len(), 1);
        assert!(failures[0].contains("'Miscellaneous'"));
        assert!(failures[0].contains("Segmentation"));
    }

    #[test]
    fn missing_category_key_produces_single_missing_key_diagnostic() {
        let registry = RuleRegistry::default();
        let manifest = manifest(r#"{"scm_url": "https://github.com/org/Slicer-X"}"#);
        let failures = failures(&registry, &manifest);
        assert_eq!(failures, vec!["category key is missing".to_string()]);
    }

    #[rstest]
    #[case("github.com/org/SlicerFoo", "scm_url does not match scheme://host/path")]
    #[case("ssh://github.com/org/SlicerFoo", "scm_url scheme is 'ssh'")]
    fn scm_url_failure_modes(#[case] url: &str, #[case] expected: &str) {
        let registry = RuleRegistry::default();
        let manifest = Manifest::parse(
            "X",
            &format!(r#"{{"category": "Examples", "scm_url": "{url}"}}"#),
        )
        .unwrap();
        let failures = failures(&registry, &manifest);
        assert_eq!(failures.len(), 1);
        assert!(failures[0].starts_with(expected), "got: {}", failures[0]);
    }

    #[rstest]
    #[case("git://github.com/org/SlicerFoo")]
    #[case("https://github.com/org/UpperSLICERcase")]
    fn scm_url_and_name_accept_compliant_urls(#[case] url: &str) {
        let registry = RuleRegistry::default();
        let manifest = Manifest::parse(
            "X",
            &format!(r#"{{"category": "Examples", "scm_url": "{url}"}}"#),
        )
        .unwrap();
        assert!(failures(&registry, &manifest).is_empty());
    }

    #[test]
    fn repository_name_exception_passes_without_slicer_substring() {
        let registry = RuleRegistry::default();
        let manifest = manifest(
            r#"{"category": "IGT", "scm_url": "https://github.com/org/NeedleFinder"}"#,
        );
        assert!(failures(&registry, &manifest).is_empty());
    }

    #[test]
    fn repository_name_failure_suggests_the_four_variants() {
        let registry = RuleRegistry::default();
        let manifest = manifest(
            r#"{"category": "Examples", "scm_url": "https://github.com/org/FooBar"}"#,
        );
        let failures = failures(&registry, &manifest);
        assert_eq!(failures.len(), 1);
        for variant in [
            "Slicer-FooBar",
            "Slicer_FooBar",
            "SlicerExtension-FooBar",
            "SlicerExtension_FooBar",
        ] {
            assert!(failures[0].contains(variant), "missing {variant}");
        }
    }

    #[test]
    fn archive_extension_is_stripped_from_repository_name() {
        assert_eq!(
            repository_short_name("https://github.com/org/Slicer-Foo.git"),
            "Slicer-Foo"
        );
        assert_eq!(repository_short_name("https://github.com/org/dcmqi"), "dcmqi");
    }

    #[rstest]
    #[case("project(FooBar)", Some("FooBar"))]
    #[case("PROJECT( FooBar VERSION 1.0 )", Some("FooBar"))]
    #[case("project(\"FooBar\")", Some("FooBar"))]
    #[case("cmake_minimum_required(VERSION 3.5)\nproject('FooBar' LANGUAGES CXX)", Some("FooBar"))]
    #[case("add_subdirectory(src)", None)]
    fn project_name_extraction(#[case] descriptor: &str, #[case] expected: Option<&str>) {
        assert_eq!(project_name(descriptor).as_deref(), expected);
    }

    fn content_registry() -> RuleRegistry {
        RuleRegistry::with_repository_rules(ValidationPolicy::default())
    }

    fn content_failures(snapshot: RepositorySnapshot) -> Vec<String> {
        let manifest = manifest(
            r#"{"category": "Examples", "scm_url": "https://github.com/org/Slicer-FooBar"}"#,
        );
        let inspection = Ok(snapshot);
        content_registry()
            .evaluate(&manifest, &RuleContext::with_repository(&inspection))
            .into_iter()
            .filter_map(|o| o.message)
            .collect()
    }

    #[test]
    fn repository_content_rules_pass_on_matching_repository() {
        let snapshot = RepositorySnapshot {
            files: vec!["CMakeLists.txt".to_string(), "LICENSE".to_string()],
            build_descriptor: Some("project(FooBar)".to_string()),
        };
        assert!(content_failures(snapshot).is_empty());
    }

    #[test]
    fn missing_build_descriptor_and_license_fail_distinctly() {
        let failures = content_failures(RepositorySnapshot::default());
        assert_eq!(failures.len(), 2);
        assert!(failures[0].contains("does not contain a CMakeLists.txt"));
        assert!(failures[1].contains("no license file found"));
    }

    #[test]
    fn project_name_mismatch_is_reported() {
        let snapshot = RepositorySnapshot {
            files: vec!["CMakeLists.txt".to_string(), "LICENSE.md".to_string()],
            build_descriptor: Some("project(SomethingElse)".to_string()),
        };
        let failures = content_failures(snapshot);
        assert_eq!(failures.len(), 1);
        assert!(failures[0].contains("'SomethingElse'"));
        assert!(failures[0].contains("'FooBar'"));
    }

    #[test]
    fn inspection_failure_degrades_content_rules_to_unavailable() {
        let manifest = manifest(
            r#"{"category": "Examples", "scm_url": "https://github.com/org/Slicer-FooBar"}"#,
        );
        let inspection = Err(InspectError::Timeout {
            url: "https://github.com/org/Slicer-FooBar".to_string(),
            seconds: 30,
        });
        let failures: Vec<String> = content_registry()
            .evaluate(&manifest, &RuleContext::with_repository(&inspection))
            .into_iter()
            .filter_map(|o| o.message)
            .collect();
        assert_eq!(failures.len(), 2);
        for failure in &failures {
            assert!(failure.contains("repository contents unavailable"));
            assert!(failure.contains("timed out"));
        }
    }

    #[test]
    fn unconfigured_inspection_degrades_content_rules() {
        let manifest = manifest(
            r#"{"category": "Examples", "scm_url": "https://github.com/org/Slicer-FooBar"}"#,
        );
        let failures: Vec<String> = content_registry()
            .evaluate(&manifest, &RuleContext::empty())
            .into_iter()
            .filter_map(|o| o.message)
            .collect();
        assert_eq!(failures.len(), 2);
        assert!(failures[0].contains("no repository inspection was configured"));
    }

    #[test]
    fn needs_repository_reflects_registered_rules() {
        assert!(!RuleRegistry::default().needs_repository());
        assert!(content_registry().needs_repository());
    }
}
