//! Flat console rendering

use colored::Colorize;
use ext_core::Report;

/// Print the flat listing: failing manifests with their failures, then the
/// corpus-wide sections and the total.
pub fn print(report: &Report, corpus_size: Option<usize>) {
    for entry in &report.entries {
        if entry.has_failures() {
            println!("{}.json", entry.name);
            for failure in &entry.failures {
                println!("  {}", failure.red());
            }
        }
    }
    println!("Checked content of {} description files.", report.entries.len());

    if let Some(count) = corpus_size {
        println!("Checked dependency between {count} extensions.");
        for error in &report.dependency_errors {
            println!("{}", error.to_string().red());
        }
    }

    if !report.structural_errors.is_empty() {
        println!("Layout validation failed:");
        for error in &report.structural_errors {
            println!("  {}", error.to_string().red());
        }
    }

    let total = report.total_failures();
    let summary = format!("Total errors found in extension descriptions: {total}");
    if total == 0 {
        println!("{}", summary.green());
    } else {
        println!("{}", summary.red().bold());
    }
}
