//! CLI integration tests for folio
//!
//! Tests the folio CLI commands end-to-end using assert_cmd. Every test runs
//! against its own temp config dir so database, media, and config files never
//! leak between tests or into the user's real locations.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Helper holding the isolated environment for one test
struct TestEnv {
    config_dir: TempDir,
    data_dir: TempDir,
}

impl TestEnv {
    fn new() -> Self {
        let env = Self {
            config_dir: TempDir::new().unwrap(),
            data_dir: TempDir::new().unwrap(),
        };

        // Point the database and media root into the test's data dir
        env.cmd()
            .args([
                "config",
                "set",
                "database.path",
                &env.data_dir.path().join("folio.db").display().to_string(),
            ])
            .assert()
            .success();
        env.cmd()
            .args([
                "config",
                "set",
                "media.root",
                &env.data_dir.path().join("media").display().to_string(),
            ])
            .assert()
            .success();

        env
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("folio").unwrap();
        cmd.env("FOLIO_CONFIG_DIR", self.config_dir.path());
        cmd.env("RUST_LOG", "warn");
        cmd
    }
}

#[test]
fn test_help_lists_commands() {
    Command::cargo_bin("folio")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("projects"))
        .stdout(predicate::str::contains("seed"))
        .stdout(predicate::str::contains("doctor"));
}

#[test]
fn test_config_set_and_get() {
    let env = TestEnv::new();

    env.cmd()
        .args(["config", "set", "notify.operator_email", "ops@folio.dev"])
        .assert()
        .success();

    env.cmd()
        .args(["config", "get", "notify.operator_email"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ops@folio.dev"));
}

#[test]
fn test_config_rejects_unknown_key() {
    let env = TestEnv::new();

    env.cmd()
        .args(["config", "get", "nonsense.key"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown configuration key"));
}

#[test]
fn test_project_create_and_list() {
    let env = TestEnv::new();

    env.cmd()
        .args([
            "projects",
            "create",
            "Hello World",
            "--description",
            "A first portfolio entry.",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("hello-world"))
        .stdout(predicate::str::contains("Project created."));

    env.cmd()
        .args(["projects", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Hello World"))
        .stdout(predicate::str::contains("1 project(s)."));
}

#[test]
fn test_project_delete_unknown_id_fails() {
    let env = TestEnv::new();

    env.cmd()
        .args(["projects", "delete", "no-such-id"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_seed_populates_catalog_and_projects() {
    let env = TestEnv::new();

    env.cmd()
        .args(["seed", "--count", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Seeded 3 projects"));

    env.cmd()
        .args(["technologies", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Rust"));
}

#[test]
fn test_doctor_reports_healthy_database() {
    let env = TestEnv::new();

    env.cmd()
        .arg("doctor")
        .assert()
        .success()
        .stdout(predicate::str::contains("Database: ok"))
        .stdout(predicate::str::contains("Schema: v"));
}
