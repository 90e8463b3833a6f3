//! Create command integration tests.

use predicates::prelude::*;
use serial_test::serial;

use super::common::TestEnv;

#[test]
#[serial]
fn create_non_interactive() {
  let env = TestEnv::empty();

  env
    .dscli_cmd()
    .args(["create", "shipper", "--non-interactive", "-d", "Log shipper"])
    .assert()
    .success()
    .stdout(predicate::str::contains("Project 'shipper' created"))
    .stdout(predicate::str::contains("cd shipper"));

  let project = env.path().join("shipper");
  for dir in ["cmd", "internal", "pkg", "logs", "bin"] {
    assert!(project.join(dir).is_dir(), "{dir} should exist");
  }

  let manifest: serde_json::Value = serde_json::from_str(&env.read_file("shipper/manifest.json")).unwrap();
  assert_eq!(manifest["name"], "shipper");
  assert_eq!(manifest["description"], "Log shipper");
  assert_eq!(manifest["version"], "1.0.0");
  assert_eq!(manifest["author"], "DataShell Team");
  assert_eq!(manifest["manifest_version"], 1);
  assert_eq!(manifest["executable"], serde_json::json!(["./bin/shipper"]));

  let config: serde_json::Value = serde_json::from_str(&env.read_file("shipper/.dscli.json")).unwrap();
  assert_eq!(config["output_dir"], "dist");
}

#[test]
#[serial]
fn create_with_version_and_author() {
  let env = TestEnv::empty();

  env
    .dscli_cmd()
    .args([
      "create",
      "svc",
      "--non-interactive",
      "--project-version",
      "0.3.0",
      "--author",
      "Ops",
    ])
    .assert()
    .success();

  let manifest: serde_json::Value = serde_json::from_str(&env.read_file("svc/manifest.json")).unwrap();
  assert_eq!(manifest["version"], "0.3.0");
  assert_eq!(manifest["author"], "Ops");
}

#[test]
#[serial]
fn create_existing_project_fails() {
  let env = TestEnv::empty();
  env.dscli_cmd().args(["create", "svc", "--non-interactive"]).assert().success();

  env
    .dscli_cmd()
    .args(["create", "svc", "--non-interactive"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("project already exists"));
}

#[test]
#[serial]
fn create_without_name_fails_non_interactive() {
  let env = TestEnv::empty();

  env
    .dscli_cmd()
    .args(["create", "--non-interactive"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("project name is required"));
}

#[test]
#[serial]
fn create_without_terminal_requires_flag() {
  let env = TestEnv::empty();

  env
    .dscli_cmd()
    .args(["create", "svc"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("non-interactive mode"));
}

#[cfg(unix)]
#[test]
#[serial]
fn created_project_builds() {
  let env = TestEnv::empty();
  env.dscli_cmd().args(["create", "svc", "--non-interactive"]).assert().success();

  env
    .dscli_cmd()
    .args(["-C", "svc", "build", "-t", "linux/amd64"])
    .assert()
    .success();

  let archive = env.path().join("svc/dist/svc_linux_amd64.tar.gz");
  let names = super::common::archive_names(&archive);
  assert_eq!(names, vec!["bin", "bin/svc", "manifest.json"]);
}
