//! Structured markdown rendering
//!
//! Summary with pass/fail counts, per-extension issues grouped by rule
//! category, corpus-wide sections, and a check-type pass/fail table.

use chrono::Utc;
use ext_core::{Report, RuleCategory};

use super::{browse_url, category_heading, category_row_label};

/// Render the full markdown report.
pub fn render(report: &Report, corpus_size: Option<usize>) -> String {
    let mut lines: Vec<String> = Vec::new();

    lines.push("# Extension Description Files Validation Report".to_string());
    lines.push(String::new());
    lines.push(format!(
        "**Generated on:** {}",
        Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    ));
    lines.push(String::new());

    summary_section(report, corpus_size, &mut lines);
    structure_section(report, &mut lines);
    extension_issues_section(report, &mut lines);
    dependency_section(report, &mut lines);
    check_results_section(report, &mut lines);

    lines.join("\n")
}

fn summary_section(report: &Report, corpus_size: Option<usize>, lines: &mut Vec<String>) {
    lines.push("## Summary".to_string());
    lines.push(String::new());
    lines.push(format!(
        "- **Total extensions checked:** {}",
        report.entries.len()
    ));
    lines.push(format!(
        "- **Extensions with errors:** {}",
        report.entries_with_failures()
    ));
    lines.push(format!(
        "- **Total validation errors:** {}",
        report.manifest_failures()
    ));
    lines.push(format!(
        "- **Dependency errors:** {}",
        report.dependency_errors.len()
    ));
    lines.push(format!(
        "- **Structural errors:** {}",
        report.structural_errors.len()
    ));
    if let Some(count) = corpus_size {
        lines.push(format!("- **Corpus size:** {count}"));
    }
    lines.push(String::new());
    if report.is_clean() {
        lines.push("✅ **All validations passed!**".to_string());
    } else {
        lines.push("❌ **Validation issues found**".to_string());
    }
    lines.push(String::new());
}

fn structure_section(report: &Report, lines: &mut Vec<String>) {
    if report.structural_errors.is_empty() {
        return;
    }
    lines.push("## Repository Structure Issues".to_string());
    lines.push(String::new());
    lines.push("The following unexpected files or directories were found:".to_string());
    lines.push(String::new());
    for error in &report.structural_errors {
        lines.push(format!("- ❌ `{}`", error.path));
    }
    lines.push(String::new());
}

fn extension_issues_section(report: &Report, lines: &mut Vec<String>) {
    if report.entries_with_failures() == 0 {
        return;
    }
    lines.push("## Extension Validation Issues".to_string());
    lines.push(String::new());

    for entry in &report.entries {
        if !entry.has_failures() {
            continue;
        }
        lines.push(format!("### {}", entry.name));
        lines.push(String::new());
        if let Some(scm_url) = &entry.scm_url {
            let url = browse_url(scm_url);
            lines.push(format!("**Repository:** [{url}]({url})"));
            lines.push(String::new());
        }
        for category in RuleCategory::ALL {
            let failures = entry.failures_in(category);
            if failures.is_empty() {
                continue;
            }
            lines.push(format!("**{}:**", category_heading(category)));
            for failure in failures {
                lines.push(format!("- ❌ {failure}"));
            }
            lines.push(String::new());
        }
        let other = entry.other_failures();
        if !other.is_empty() {
            lines.push("**Other Issues:**".to_string());
            for failure in other {
                lines.push(format!("- ❌ {failure}"));
            }
            lines.push(String::new());
        }
    }
}

fn dependency_section(report: &Report, lines: &mut Vec<String>) {
    if report.dependency_errors.is_empty() {
        return;
    }
    lines.push("## Dependency Issues".to_string());
    lines.push(String::new());
    for error in &report.dependency_errors {
        lines.push(format!("- ❌ {error}"));
    }
    lines.push(String::new());
}

fn check_results_section(report: &Report, lines: &mut Vec<String>) {
    lines.push("## Validation Check Results".to_string());
    lines.push(String::new());
    lines.push("| Check Type | ✅ Pass | ❌ Fail |".to_string());
    lines.push("|------------|---------|---------|".to_string());
    for category in RuleCategory::ALL {
        // Only tally checks that actually ran this run.
        if !report.has_category(category) {
            continue;
        }
        let tally = report.category_tally(category);
        lines.push(format!(
            "| {} | {} | {} |",
            category_row_label(category),
            tally.pass,
            tally.fail
        ));
    }
    let structure_ok = report.structural_errors.is_empty();
    lines.push(format!(
        "| Structure | {} | {} |",
        usize::from(structure_ok),
        usize::from(!structure_ok)
    ));
    lines.push(String::new());
}

#[cfg(test)]
mod tests {
    use super::*;
    use ext_core::{ManifestCandidate, Orchestrator, RuleRegistry, StructuralError};

    fn report(candidates: &[ManifestCandidate]) -> Report {
        let registry = RuleRegistry::default();
        let results = Orchestrator::new(&registry).run(candidates);
        Report::build(results, Vec::new(), Vec::new())
    }

    #[test]
    fn clean_report_renders_all_pass() {
        let report = report(&[ManifestCandidate::new(
            "SlicerDemo",
            r#"{"category": "Examples", "scm_url": "https://github.com/org/SlicerDemo"}"#,
        )]);
        let doc = render(&report, None);
        assert!(doc.contains("✅ **All validations passed!**"));
        assert!(doc.contains("| Category Check | 1 | 0 |"));
        assert!(!doc.contains("## Extension Validation Issues"));
    }

    #[test]
    fn failures_are_grouped_by_category() {
        let report = report(&[ManifestCandidate::new(
            "FooBar",
            r#"{"category": "Nope", "scm_url": "https://github.com/org/FooBar"}"#,
        )]);
        let doc = render(&report, None);
        assert!(doc.contains("### FooBar"));
        assert!(doc.contains("**Category Issues:**"));
        assert!(doc.contains("**Repository Name Issues:**"));
        assert!(doc.contains("| Category Check | 0 | 1 |"));
        assert!(doc.contains("| SCM URL Syntax | 1 | 0 |"));
    }

    #[test]
    fn parse_failures_land_under_other_issues() {
        let report = report(&[ManifestCandidate::new("Broken", "{oops")]);
        let doc = render(&report, None);
        assert!(doc.contains("**Other Issues:**"));
        assert!(doc.contains("failed to parse"));
    }

    #[test]
    fn structural_errors_get_their_own_section() {
        let registry = RuleRegistry::default();
        let results = Orchestrator::new(&registry).run(&[]);
        let report = Report::build(
            results,
            Vec::new(),
            vec![StructuralError {
                path: "notes.txt".to_string(),
            }],
        );
        let doc = render(&report, None);
        assert!(doc.contains("## Repository Structure Issues"));
        assert!(doc.contains("- ❌ `notes.txt`"));
        assert!(doc.contains("| Structure | 0 | 1 |"));
    }

    #[test]
    fn repository_content_row_only_appears_when_it_ran() {
        let report = report(&[ManifestCandidate::new(
            "SlicerDemo",
            r#"{"category": "Examples", "scm_url": "https://github.com/org/SlicerDemo"}"#,
        )]);
        let doc = render(&report, None);
        assert!(!doc.contains("| Repository Content |"));
    }
}
