//! Integration tests for the dirload CLI
//!
//! Each test builds a small project tree in a temp dir and drives the
//! binary against it.

use assert_cmd::cargo;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Helper function to create a dirload command
fn dirload() -> assert_cmd::Command {
    assert_cmd::Command::new(cargo::cargo_bin!("dirload"))
}

/// Helper to write a file, creating parent directories
fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// Project with a few JSON route documents
fn routes_project() -> TempDir {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "routes/users.json", r#"{"path": "/users"}"#);
    write(temp.path(), "routes/admin/panel.json", r#"{"path": "/admin"}"#);
    write(temp.path(), "routes/notes.txt", "not matched");
    temp
}

// =============================================================================
// BASICS
// =============================================================================

#[test]
fn test_version_flag() {
    dirload()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_version_command() {
    dirload()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("dirload v"));
}

#[test]
fn test_version_command_json() {
    dirload()
        .args(["--json", "version"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"version\""));
}

#[test]
fn test_help_lists_scan() {
    dirload()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("scan"));
}

// =============================================================================
// SCAN
// =============================================================================

#[test]
fn test_scan_json_documents() {
    let temp = routes_project();

    let output = dirload()
        .args(["--json", "scan", "routes", "--format", "json"])
        .current_dir(temp.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let result: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let loaded = result["loaded"].as_array().unwrap();
    assert_eq!(loaded.len(), 2);
    assert_eq!(loaded[0]["name"], "panel");
    assert_eq!(loaded[0]["target"]["path"], "/admin");
    assert_eq!(loaded[1]["name"], "users");
    assert!(result["skipped"].as_array().unwrap().is_empty());
}

#[test]
fn test_scan_human_output() {
    let temp = routes_project();

    dirload()
        .args(["scan", "routes", "--base-dir"])
        .arg(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Loaded 2 module(s)"))
        .stdout(predicate::str::contains("users"))
        .stdout(predicate::str::contains("notes").not());
}

#[test]
fn test_scan_reports_broken_file_and_continues() {
    let temp = routes_project();
    write(temp.path(), "routes/broken.json", "{ nope");

    dirload()
        .args(["scan", "routes", "--format", "json"])
        .current_dir(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Loaded 2 module(s)"))
        .stdout(predicate::str::contains("Skipped 1 entry:"))
        .stdout(predicate::str::contains("broken.json"));
}

#[test]
fn test_scan_fail_fast_on_broken_file() {
    let temp = routes_project();
    write(temp.path(), "routes/broken.json", "{ nope");

    dirload()
        .args(["scan", "routes", "--format", "json", "--fail-fast"])
        .current_dir(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("broken.json"));
}

#[test]
fn test_scan_rejects_parent_directory() {
    let temp = routes_project();

    dirload()
        .args(["scan", "../elsewhere"])
        .current_dir(temp.path().join("routes"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("path traversal"));
}

#[test]
fn test_scan_without_directories_fails() {
    let temp = routes_project();

    dirload()
        .arg("scan")
        .current_dir(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid arguments"));
}

#[test]
fn test_scan_source_format_with_first_dot() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "test/Test.test.ts", "export {}\n");
    write(temp.path(), "test/Test2.test.ts", "export {}\n");

    let output = dirload()
        .args(["--json", "scan", "test", "--format", "source", "--first-dot"])
        .args(["--pattern", "**/**.test.ts"])
        .current_dir(temp.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let result: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let names: Vec<_> = result["loaded"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["Test", "Test2"]);
}

#[test]
fn test_scan_unwrap_default() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "plugins/auth.json", r#"{"default": {"enabled": true}}"#);

    let output = dirload()
        .args(["--json", "scan", "plugins", "--unwrap-default"])
        .current_dir(temp.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let result: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(result["loaded"][0]["target"]["enabled"], true);
}

// =============================================================================
// CONFIG
// =============================================================================

#[test]
fn test_config_discovered_in_base_dir() {
    let temp = routes_project();
    write(
        temp.path(),
        "dirload.toml",
        r#"
directories = ["routes"]
pattern = ["**/*.json"]
allowed_extensions = ["json"]
"#,
    );

    dirload()
        .args(["scan", "--base-dir"])
        .arg(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Loaded 2 module(s)"));
}

#[test]
fn test_flags_override_config() {
    let temp = routes_project();
    write(
        temp.path(),
        "dirload.toml",
        r#"
directories = ["routes"]
pattern = ["**/*.json"]
allowed_extensions = ["json"]
"#,
    );

    dirload()
        .args(["scan", "routes/admin", "--base-dir"])
        .arg(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Loaded 1 module(s)"));
}

#[test]
fn test_explicit_config_file() {
    let temp = routes_project();
    write(
        temp.path(),
        "conf/loader.toml",
        r#"
base_dir = ".."
directories = ["routes/admin"]
pattern = ["**/*.json"]
allowed_extensions = ["json"]
"#,
    );

    dirload()
        .args(["--json", "scan", "--config"])
        .arg(temp.path().join("conf/loader.toml"))
        .assert()
        .success()
        .stdout(predicate::str::contains("\"panel\""));
}

#[test]
fn test_invalid_config_fails() {
    let temp = routes_project();
    write(temp.path(), "dirload.toml", "directories = 3\n");

    dirload()
        .args(["scan", "routes", "--base-dir"])
        .arg(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}
