//! Add command integration tests.

use predicates::prelude::*;
use serial_test::serial;

use super::common::TestEnv;

#[test]
#[serial]
fn add_creates_entry_point() {
  let env = TestEnv::project();

  env
    .dscli_cmd()
    .args(["add", "metrics"])
    .assert()
    .success()
    .stdout(predicate::str::contains("Registered ./bin/metrics"));

  assert!(env.read_file("cmd/metrics/main.go").contains("package main"));
  let manifest: serde_json::Value = serde_json::from_str(&env.read_file("manifest.json")).unwrap();
  assert_eq!(manifest["executable"], serde_json::json!(["./bin/demo", "./bin/metrics"]));
}

#[test]
#[serial]
fn add_twice_is_a_no_op() {
  let env = TestEnv::project();

  env.dscli_cmd().args(["add", "metrics"]).assert().success();
  env
    .dscli_cmd()
    .args(["add", "metrics"])
    .assert()
    .success()
    .stdout(predicate::str::contains("already exists"))
    .stdout(predicate::str::contains("already listed"));

  let manifest: serde_json::Value = serde_json::from_str(&env.read_file("manifest.json")).unwrap();
  assert_eq!(manifest["executable"], serde_json::json!(["./bin/demo", "./bin/metrics"]));
}

#[test]
#[serial]
fn add_outside_project_fails() {
  let env = TestEnv::empty();

  env
    .dscli_cmd()
    .args(["add", "metrics"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("not a dsserv project"));

  assert!(!env.path().join("cmd").exists());
}

#[test]
#[serial]
fn add_rejects_path_like_names() {
  let env = TestEnv::project();

  env
    .dscli_cmd()
    .args(["add", "../escape"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("invalid name"));
}

#[cfg(unix)]
#[test]
#[serial]
fn added_entry_point_is_built() {
  let env = TestEnv::project();

  env.dscli_cmd().args(["add", "metrics"]).assert().success();
  env
    .dscli_cmd()
    .args(["build", "-t", "linux/amd64"])
    .assert()
    .success()
    .stdout(predicate::str::contains("bin/metrics"));
}

#[test]
#[serial]
fn verbose_add_logs_entry_point() {
  let env = TestEnv::project();

  env
    .dscli_cmd()
    .args(["--verbose", "add", "metrics"])
    .assert()
    .success()
    .stdout(predicate::str::contains("Next steps:"))
    .stdout(predicate::str::contains("edit cmd/metrics/main.go"))
    .stderr(predicate::str::contains("added entry point"));
}
