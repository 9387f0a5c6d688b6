//! Validate command implementation
//!
//! Wires the collaborators around the engine: reads candidate files, runs
//! the orchestrator, then the corpus-wide dependency and layout checks, and
//! renders the merged report.

use std::path::{Path, PathBuf};
use std::time::Duration;

use ext_core::{
    graph, Manifest, ManifestCandidate, Orchestrator, Report, RuleRegistry, StructuralError,
    ValidationPolicy,
};
use ext_fs::LayoutPolicy;
use ext_git::GitInspector;

use crate::cli::OutputFormat;
use crate::error::{CliError, Result};
use crate::render;

/// Options for the validate command.
#[derive(Debug, Clone)]
pub struct ValidateOptions {
    pub files: Vec<PathBuf>,
    pub corpus: Option<PathBuf>,
    pub format: OutputFormat,
    pub output: Option<PathBuf>,
    pub with_repository: bool,
    pub clone_timeout: u64,
    pub checkout_timeout: u64,
    pub jobs: usize,
    pub binary_exit: bool,
}

/// Run the validate command. Returns the process exit code.
pub fn run_validate(opts: ValidateOptions) -> Result<i32> {
    // An invalid output sink is fatal before any validation work starts.
    if let Some(output) = &opts.output {
        if output.extension().is_none_or(|ext| ext != "md") {
            return Err(CliError::user("report file must have a .md extension"));
        }
        if opts.format != OutputFormat::Markdown {
            return Err(CliError::user(
                "--output is only supported with --format markdown",
            ));
        }
    }

    let candidates = collect_candidates(&opts.files);

    let policy = ValidationPolicy::default();
    let registry = if opts.with_repository {
        RuleRegistry::with_repository_rules(policy)
    } else {
        RuleRegistry::default_rules(policy)
    };
    let inspector = opts.with_repository.then(|| {
        GitInspector::new().with_timeouts(
            Duration::from_secs(opts.clone_timeout),
            Duration::from_secs(opts.checkout_timeout),
        )
    });
    let mut orchestrator = Orchestrator::new(&registry).with_pool_size(opts.jobs);
    if let Some(inspector) = inspector.as_ref() {
        orchestrator = orchestrator.with_inspector(inspector);
    }
    let results = orchestrator.run(&candidates);

    // The corpus-wide checks need global visibility and run once, after all
    // individual validations.
    let mut dependency_errors = Vec::new();
    let mut structural_errors = Vec::new();
    let mut corpus_size = None;
    if let Some(dir) = &opts.corpus {
        let manifests = load_corpus(dir)?;
        corpus_size = Some(manifests.len());
        dependency_errors = graph::validate(&manifests);
        structural_errors = ext_fs::scan_layout(dir, &LayoutPolicy::default())?
            .into_iter()
            .map(|path| StructuralError {
                path: path.display().to_string(),
            })
            .collect();
    }

    let report = Report::build(results, dependency_errors, structural_errors);

    match opts.format {
        OutputFormat::Console => render::console::print(&report, corpus_size),
        OutputFormat::Markdown => {
            let document = render::markdown::render(&report, corpus_size);
            match &opts.output {
                Some(path) => {
                    std::fs::write(path, document)?;
                    println!("Markdown report written to {}", path.display());
                }
                None => println!("{document}"),
            }
        }
    }

    let total = report.total_failures();
    if opts.binary_exit {
        Ok(if total == 0 { 0 } else { 1 })
    } else {
        // Exit statuses are a single byte; saturate rather than wrap.
        Ok(total.min(255) as i32)
    }
}

/// Read the candidate files, skipping paths that are not description files
/// and carrying unreadable ones through as pre-failed candidates so the
/// report keeps the input ordering.
fn collect_candidates(files: &[PathBuf]) -> Vec<ManifestCandidate> {
    let mut candidates = Vec::new();
    for path in files {
        if !ext_fs::is_manifest_file(path) {
            println!("Skipping {} (not a .json file)", path.display());
            continue;
        }
        if !path.is_file() {
            println!("Skipping {} (not a file)", path.display());
            continue;
        }
        let Some(name) = ext_fs::manifest_name(path) else {
            continue;
        };
        match std::fs::read_to_string(path) {
            Ok(text) => candidates.push(ManifestCandidate::new(name, text)),
            Err(err) => candidates.push(ManifestCandidate::unavailable(
                name,
                format!("failed to read '{}': {err}", path.display()),
            )),
        }
    }
    candidates
}

/// Parse every description file of the corpus directory. Parse failures are
/// excluded from the available set (their dependents still get checked) and
/// reported on stdout.
fn load_corpus(dir: &Path) -> Result<Vec<Manifest>> {
    let mut manifests = Vec::new();
    for path in ext_fs::discover_manifests(dir)? {
        let Some(name) = ext_fs::manifest_name(&path) else {
            continue;
        };
        let text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) => {
                println!("Skipping {} (failed to read: {err})", path.display());
                continue;
            }
        };
        match Manifest::parse(&name, &text) {
            Ok(manifest) => manifests.push(manifest),
            Err(failure) => println!("{failure}"),
        }
    }
    Ok(manifests)
}
