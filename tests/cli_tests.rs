//! CLI integration tests using the real mur binary

mod common;

use common::TestProject;
use predicates::prelude::*;

#[test]
fn test_help_output() {
    TestProject::new()
        .mur()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("install"))
        .stdout(predicate::str::contains("uninstall"))
        .stdout(predicate::str::contains("publish"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn test_version_output() {
    TestProject::new()
        .mur()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("mur "));
}

#[test]
fn test_unknown_subcommand() {
    TestProject::new()
        .mur()
        .arg("frobnicate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized subcommand"));
}

#[test]
fn test_completions_bash() {
    TestProject::new()
        .mur()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("_mur"));
}

#[test]
fn test_completions_unknown_shell() {
    TestProject::new()
        .mur()
        .args(["completions", "tcsh"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown shell: tcsh"))
        .stderr(predicate::str::contains("[400]"))
        .stderr(predicate::str::contains("Supported shells"));
}

#[test]
fn test_publish_without_build_manifest() {
    TestProject::new()
        .mur()
        .arg("publish")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Error:"))
        .stderr(predicate::str::contains("murmur-build.yaml"))
        .stderr(predicate::str::contains("[201]"));
}

#[test]
fn test_publish_without_index_url() {
    let project = TestProject::new();
    project.write_file(
        "murmur-build.yaml",
        "name: my-planner\nversion: 1.0.0\ntype: agent\n",
    );
    project
        .mur()
        .arg("publish")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("No registry index-url configured"));
}

#[test]
fn test_publish_private_missing_dist_dir() {
    let project = TestProject::new();
    project.write_file(
        "murmur-build.yaml",
        "name: my-planner\nversion: 1.0.0\ntype: agent\n",
    );
    project.write_file(
        ".murmurrc",
        "[murmur-nexus]\nindex-url = http://localhost:1/simple\n",
    );
    project
        .mur()
        .arg("publish")
        .assert()
        .failure()
        .stderr(predicate::str::contains("File not found"))
        .stderr(predicate::str::contains("dist"));
}
