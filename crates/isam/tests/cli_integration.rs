//! CLI integration tests for the isam command-line interface.
//!
//! These tests do not require a reachable appliance: they cover argument
//! parsing, context management, and the paths where requirement checks skip
//! the network entirely.

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;

/// Get a command for the isam binary with a given config file.
fn isam(config: &Path) -> Command {
    let mut cmd = Command::cargo_bin("isam").unwrap();
    cmd.env_remove("ISAM_CONTEXT")
        .env_remove("RUST_LOG")
        .arg("--config")
        .arg(config);
    cmd
}

const CONFIG: &str = r#"
current-context: lab
contexts:
  - name: lab
    hostname: http://127.0.0.1:9
    user: admin@local
    password: admin
    model: Appliance
  - name: docker
    hostname: http://127.0.0.1:9
    user: admin@local
    password: admin
    model: Docker
"#;

fn write_config(dir: &tempfile::TempDir) -> std::path::PathBuf {
    let path = dir.path().join("appliances.yaml");
    std::fs::write(&path, CONFIG).unwrap();
    path
}

// ─────────────────────────────────────────────────────────────────────────────
// Help and Version Tests
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_help_lists_subcommands() {
    Command::cargo_bin("isam")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("dsc"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn test_version_displays() {
    Command::cargo_bin("isam")
        .unwrap()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("isam"));
}

#[test]
fn test_dsc_set_help_lists_flags() {
    Command::cargo_bin("isam")
        .unwrap()
        .args(["dsc", "set", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--worker-threads"))
        .stdout(predicate::str::contains("--check-mode"))
        .stdout(predicate::str::contains("--force"));
}

#[test]
fn test_dsc_set_rejects_bad_server() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(&dir);

    isam(&config)
        .args(["dsc", "set", "--server", "10.0.0.1:443"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("IP:SERVICE_PORT:REPLICATION_PORT"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Context Management
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_get_contexts_marks_current() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(&dir);

    isam(&config)
        .args(["config", "get-contexts"])
        .assert()
        .success()
        .stdout(predicate::str::contains("*         lab"))
        .stdout(predicate::str::contains("docker"));
}

#[test]
fn test_use_context_persists() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(&dir);

    isam(&config)
        .args(["config", "use-context", "docker"])
        .assert()
        .success();

    isam(&config)
        .args(["config", "current-context"])
        .assert()
        .success()
        .stdout(predicate::str::contains("docker"));
}

#[test]
fn test_use_unknown_context_fails() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(&dir);

    isam(&config)
        .args(["config", "use-context", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_dsc_without_context_fails() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("absent.yaml");

    isam(&config)
        .args(["dsc", "get"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no current context"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Model Gating (no network)
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_dsc_get_on_unsupported_model_warns() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(&dir);

    isam(&config)
        .args(["--json", "dsc", "get"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "API invoked requires model: Docker, appliance is of deployment model: Appliance.",
        ));
}

#[test]
fn test_dsc_set_on_unsupported_model_is_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(&dir);

    isam(&config)
        .args(["--json", "dsc", "set", "--worker-threads", "128"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"changed\": false"));
}

#[test]
fn test_dsc_compare_names_failing_appliance() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(&dir);

    isam(&config)
        .args(["--json", "--context", "docker", "dsc", "compare", "--with", "lab"])
        .assert()
        .success()
        .stdout(predicate::str::contains("appliance2 is of deployment model: Appliance"));
}

#[test]
fn test_verbose_summary_shows_return_code() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(&dir);

    isam(&config)
        .args(["--verbose", "dsc", "get"])
        .assert()
        .success()
        .stdout(predicate::str::contains("rc: 0"))
        .stdout(predicate::str::contains("warnings: 1"));

    isam(&config)
        .args(["dsc", "get"])
        .assert()
        .success()
        .stdout(predicate::str::contains("rc:").not());
}
