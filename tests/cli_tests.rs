//! Integration tests for the sd binary

#![allow(deprecated)] // cargo_bin is the standard way to test CLI binaries

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn test_cli_help() {
    let mut cmd = Command::cargo_bin("sd").unwrap();
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Stacked git branches"))
        .stdout(predicate::str::contains("add"))
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("tree"))
        .stdout(predicate::str::contains("prune"))
        .stdout(predicate::str::contains("alias"));
}

#[test]
fn test_cli_version() {
    let mut cmd = Command::cargo_bin("sd").unwrap();
    cmd.arg("--version");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_cli_no_args_shows_usage() {
    let mut cmd = Command::cargo_bin("sd").unwrap();

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_run_help() {
    let mut cmd = Command::cargo_bin("sd").unwrap();
    cmd.args(["run", "--help"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("--pre-flight"))
        .stdout(predicate::str::contains("--continue"))
        .stdout(predicate::str::contains("--abort"));
}

#[test]
fn test_alias_help() {
    let mut cmd = Command::cargo_bin("sd").unwrap();
    cmd.args(["alias", "--help"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("set"))
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("show"))
        .stdout(predicate::str::contains("rm"));
}

#[test]
fn test_alias_set_requires_run() {
    let mut cmd = Command::cargo_bin("sd").unwrap();
    cmd.args(["alias", "set", "mypush"]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("--run"));
}

#[test]
fn test_outside_git_repository() {
    let temp = tempfile::TempDir::new().unwrap();
    let mut cmd = Command::cargo_bin("sd").unwrap();
    cmd.arg("tree").current_dir(temp.path());
    // Make sure a repository above the temp dir is never picked up.
    cmd.env("GIT_CEILING_DIRECTORIES", temp.path());

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("not inside a git repository"));
}
