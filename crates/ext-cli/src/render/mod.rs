//! Report renderers
//!
//! The engine hands over one typed report; these collaborators turn it into
//! a flat console listing or a structured markdown document.

pub mod console;
pub mod markdown;

use ext_core::RuleCategory;

/// Section heading used for one rule category in structured output.
pub(crate) fn category_heading(category: RuleCategory) -> &'static str {
    match category {
        RuleCategory::Category => "Category Issues",
        RuleCategory::ScmUrl => "SCM URL Issues",
        RuleCategory::RepositoryName => "Repository Name Issues",
        RuleCategory::RepositoryContent => "Repository Content Issues",
    }
}

/// Row label used for one rule category in the check-type table.
pub(crate) fn category_row_label(category: RuleCategory) -> &'static str {
    match category {
        RuleCategory::Category => "Category Check",
        RuleCategory::ScmUrl => "SCM URL Syntax",
        RuleCategory::RepositoryName => "Repository Name",
        RuleCategory::RepositoryContent => "Repository Content",
    }
}

/// Normalize an scm_url into a browsable https URL.
pub(crate) fn browse_url(scm_url: &str) -> String {
    let url = if let Some(rest) = scm_url.strip_prefix("git://") {
        format!("https://{rest}")
    } else if let Some(rest) = scm_url.strip_prefix("git@") {
        format!("https://{}", rest.replacen(':', "/", 1))
    } else {
        scm_url.to_string()
    };
    url.strip_suffix(".git").map(str::to_string).unwrap_or(url)
}
