//! CLI end-to-end tests that invoke the compiled `extcheck` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use tempfile::TempDir;

fn extcheck() -> Command {
    Command::cargo_bin("extcheck").expect("extcheck binary should build")
}

fn write(dir: &Path, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

#[test]
fn help_exits_zero_and_mentions_validate() {
    extcheck()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("validate"));
}

#[test]
fn clean_corpus_exits_zero() {
    let temp = TempDir::new().unwrap();
    let manifest = write(
        temp.path(),
        "SlicerDemo.json",
        r#"{"category": "Examples", "scm_url": "https://github.com/org/SlicerDemo"}"#,
    );
    extcheck()
        .arg("validate")
        .arg(&manifest)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Total errors found in extension descriptions: 0",
        ));
}

#[test]
fn exit_status_is_the_failure_count() {
    let temp = TempDir::new().unwrap();
    // Missing category, no scheme separator, bad repository name.
    let manifest = write(temp.path(), "Bad.json", r#"{"scm_url": "example.org/Bad"}"#);
    extcheck()
        .arg("validate")
        .arg(&manifest)
        .assert()
        .code(3)
        .stdout(predicate::str::contains("Bad.json"))
        .stdout(predicate::str::contains("category key is missing"));
}

#[test]
fn binary_exit_collapses_the_count() {
    let temp = TempDir::new().unwrap();
    let manifest = write(temp.path(), "Bad.json", r#"{"scm_url": "example.org/Bad"}"#);
    extcheck()
        .arg("validate")
        .arg(&manifest)
        .arg("--binary-exit")
        .assert()
        .code(1);
}

#[test]
fn corpus_flag_enables_the_dependency_check() {
    let temp = TempDir::new().unwrap();
    let manifest = write(
        temp.path(),
        "SlicerA.json",
        r#"{"category": "Examples", "scm_url": "https://x/Slicer-A", "depends": ["Ghost"]}"#,
    );
    extcheck()
        .arg("validate")
        .arg(&manifest)
        .arg("--corpus")
        .arg(temp.path())
        .assert()
        .code(1)
        .stdout(predicate::str::contains(
            "Ghost extension is not found. It is required by extension: SlicerA.",
        ));
}

#[test]
fn markdown_report_is_written_to_the_output_file() {
    let temp = TempDir::new().unwrap();
    let manifest = write(
        temp.path(),
        "SlicerDemo.json",
        r#"{"category": "Examples", "scm_url": "https://github.com/org/SlicerDemo"}"#,
    );
    let report = temp.path().join("report.md");
    extcheck()
        .arg("validate")
        .arg(&manifest)
        .arg("--format")
        .arg("markdown")
        .arg("--output")
        .arg(&report)
        .assert()
        .success();
    let contents = std::fs::read_to_string(&report).unwrap();
    assert!(contents.contains("# Extension Description Files Validation Report"));
    assert!(contents.contains("✅ **All validations passed!**"));
}

#[test]
fn invalid_output_sink_is_fatal() {
    extcheck()
        .arg("validate")
        .arg("--format")
        .arg("markdown")
        .arg("--output")
        .arg("report.txt")
        .assert()
        .code(2)
        .stderr(predicate::str::contains(".md"));
}

#[test]
fn layout_scan_flags_stray_files() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "SlicerDemo.json", "{}");
    write(temp.path(), "notes.txt", "scratch");
    extcheck()
        .arg("layout")
        .arg(temp.path())
        .assert()
        .code(1)
        .stdout(predicate::str::contains("notes.txt"));
}

#[test]
fn layout_scan_passes_on_a_clean_index() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "SlicerDemo.json", "{}");
    extcheck()
        .arg("layout")
        .arg(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Looking for unexpected files - done"));
}
