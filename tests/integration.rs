// Integration tests for the theoquiz CLI.
//
// These tests use assert_cmd to invoke the binary and verify
// exit codes, stdout/stderr output, and argument validation.

use assert_cmd::Command;
use predicates::prelude::*;

/// Helper to build a Command for the theoquiz binary.
fn theoquiz() -> Command {
    Command::cargo_bin("theoquiz").expect("binary should exist")
}

#[test]
fn cli_version_flag() {
    theoquiz()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("theoquiz"));
}

#[test]
fn cli_help_flag() {
    theoquiz()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Catholic theology schools quiz"));
}

#[test]
fn score_requires_answers() {
    theoquiz()
        .arg("score")
        .assert()
        .failure()
        .stderr(predicate::str::contains("required"));
}

#[test]
fn explain_requires_question_number() {
    theoquiz()
        .arg("explain")
        .assert()
        .failure()
        .stderr(predicate::str::contains("required"));
}

#[test]
fn quiet_conflicts_with_verbose() {
    theoquiz()
        .args(["-q", "-v", "lint"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}
