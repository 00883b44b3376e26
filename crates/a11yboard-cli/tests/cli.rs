//! Binary-level tests for `a11yboard`.

use assert_cmd::Command;
use predicates::prelude::*;

fn a11yboard() -> Command {
    let mut cmd = Command::cargo_bin("a11yboard").unwrap();
    cmd.env_remove("A11YBOARD_SERVER_URL")
        .env_remove("A11YBOARD_PROJECT");
    cmd
}

#[test]
fn test_help_lists_subcommands() {
    a11yboard()
        .arg("--help")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("serve")
                .and(predicate::str::contains("results"))
                .and(predicate::str::contains("artifacts"))
                .and(predicate::str::contains("widget")),
        );
}

#[test]
fn test_missing_config_file_fails() {
    a11yboard()
        .args(["--config", "/nonexistent/a11yboard.yaml", "run", "r1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load config"));
}

#[test]
fn test_bad_filter_is_rejected() {
    a11yboard()
        .args(["results", "r1", "--filter", "env[near]=ci"])
        .assert()
        .failure();
}

#[test]
fn test_unreachable_backend_fails_run() {
    a11yboard()
        .args(["--server-url", "http://127.0.0.1:9/api", "run", "r1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Could not load run r1"));
}

#[test]
fn test_widget_param_must_be_key_value() {
    a11yboard()
        .args(["--server-url", "http://127.0.0.1:9/api", "widget", "accessibility-bar-chart", "--param", "oops"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("key=value"));
}
