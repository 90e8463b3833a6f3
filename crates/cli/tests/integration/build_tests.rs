//! Build command integration tests.
//!
//! These run against a fake `go` shell script, so they are Unix-only.

#![cfg(unix)]

use predicates::prelude::*;
use serial_test::serial;

use super::common::{TestEnv, archive_entries, archive_names};

#[test]
#[serial]
fn build_single_target() {
  let env = TestEnv::project();

  env
    .dscli_cmd()
    .args(["build", "--target", "linux/arm64"])
    .assert()
    .success()
    .stdout(predicate::str::contains("demo_linux_arm64.tar.gz"))
    .stdout(predicate::str::contains("1 built, 0 skipped"));

  let archive = env.path().join("dist/demo_linux_arm64.tar.gz");
  let entries = archive_entries(&archive);
  let names: Vec<&str> = entries.iter().map(|(name, _)| name.as_str()).collect();
  assert_eq!(names, vec!["bin", "bin/demo", "bin/worker", "manifest.json"]);
  assert_eq!(entries[1].1, "linux/arm64 .");
  assert_eq!(entries[2].1, "linux/arm64 ./cmd/worker");

  let manifest: serde_json::Value = serde_json::from_str(&entries[3].1).unwrap();
  assert_eq!(manifest["os"], "linux");
  assert_eq!(manifest["arch"], "arm64");
  assert_eq!(manifest["executable"], serde_json::json!(["./bin/demo", "./bin/worker"]));
}

#[test]
#[serial]
fn build_all_targets() {
  let env = TestEnv::project();

  env.dscli_cmd().args(["build", "-t", "all"]).assert().success();

  let mut archives: Vec<String> = std::fs::read_dir(env.path().join("dist"))
    .unwrap()
    .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
    .collect();
  archives.sort();
  assert_eq!(
    archives,
    vec![
      "demo_darwin_amd64.tar.gz",
      "demo_darwin_arm64.tar.gz",
      "demo_linux_386.tar.gz",
      "demo_linux_amd64.tar.gz",
      "demo_linux_arm64.tar.gz",
      "demo_windows_386.tar.gz",
      "demo_windows_amd64.tar.gz",
      "demo_windows_arm64.tar.gz",
    ]
  );

  let windows = archive_names(&env.path().join("dist/demo_windows_amd64.tar.gz"));
  assert!(windows.contains(&"bin/demo.exe".to_string()));
  assert!(windows.contains(&"bin/worker.exe".to_string()));

  // Last target in the matrix wins on disk.
  let manifest: serde_json::Value = serde_json::from_str(&env.read_file("manifest.json")).unwrap();
  assert_eq!(manifest["os"], "linux");
  assert_eq!(manifest["arch"], "arm64");
  assert_eq!(manifest["version"], "1.0.0");

  // Staged binaries are removed after packaging.
  assert_eq!(std::fs::read_dir(env.path().join("bin")).unwrap().count(), 0);
}

#[test]
#[serial]
fn broken_entry_point_does_not_stop_siblings() {
  let env = TestEnv::project();
  env.write_file("cmd/broken/main.go", "package main\n");

  env
    .dscli_cmd()
    .args(["build", "-t", "linux/amd64"])
    .assert()
    .success()
    .stderr(predicate::str::contains("broken failed"))
    .stdout(predicate::str::contains("syntax error in ./cmd/broken"));

  let names = archive_names(&env.path().join("dist/demo_linux_amd64.tar.gz"));
  assert_eq!(names, vec!["bin", "bin/demo", "bin/worker", "manifest.json"]);
}

#[test]
#[serial]
fn failing_targets_are_skipped() {
  let env = TestEnv::project();

  env
    .dscli_cmd()
    .args(["build", "-t", "all"])
    .env("FAKE_GO_FAIL_OS", "darwin")
    .assert()
    .success()
    .stdout(predicate::str::contains("6 built, 2 skipped"))
    .stderr(predicate::str::contains("Skipping darwin/amd64"));

  assert!(!env.path().join("dist/demo_darwin_arm64.tar.gz").exists());
  assert!(env.path().join("dist/demo_linux_arm64.tar.gz").exists());
}

#[test]
#[serial]
fn build_fails_when_nothing_is_produced() {
  let env = TestEnv::project();

  env
    .dscli_cmd()
    .args(["build", "-t", "windows/arm64"])
    .env("FAKE_GO_FAIL_OS", "windows")
    .assert()
    .failure()
    .stderr(predicate::str::contains("No archives were produced"));
}

#[test]
#[serial]
fn assets_and_excludes_from_config() {
  let env = TestEnv::project();
  env.write_file(
    ".dscli.json",
    r#"{
  "assets": ["config/", {"source": "scripts/run.sh", "output": "run"}],
  "excludes": ["*.log"],
  "output_dir": "release"
}"#,
  );
  env.write_file("config/app.json", "{}");
  env.write_file("config/debug.log", "noise");
  env.write_file("scripts/run.sh", "#!/bin/sh\n");

  env.dscli_cmd().args(["build", "-t", "linux/amd64"]).assert().success();

  let names = archive_names(&env.path().join("release/demo_linux_amd64.tar.gz"));
  assert_eq!(
    names,
    vec!["bin", "bin/demo", "bin/worker", "manifest.json", "config/app.json", "run"]
  );
}

#[test]
#[serial]
fn build_json_output() {
  let env = TestEnv::project();

  let output = env
    .dscli_cmd()
    .args(["build", "-t", "linux/amd64", "--output", "json"])
    .output()
    .unwrap();
  assert!(output.status.success());

  let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
  assert_eq!(json["project"], "demo");
  assert_eq!(json["archives"][0]["target"], "linux/amd64");
  assert!(json["archives"][0]["size"].as_u64().unwrap() > 0);
  assert_eq!(json["skipped"], serde_json::json!([]));
}

#[test]
#[serial]
fn build_with_dir_flag() {
  let env = TestEnv::project();
  let elsewhere = TestEnv::empty();

  elsewhere
    .dscli_cmd()
    .arg("-C")
    .arg(env.path())
    .args(["build", "-t", "darwin/arm64"])
    .assert()
    .success();

  assert!(env.path().join("dist/demo_darwin_arm64.tar.gz").exists());
}

#[test]
#[serial]
fn build_outside_project_fails() {
  let env = TestEnv::empty();

  env
    .dscli_cmd()
    .arg("build")
    .assert()
    .failure()
    .stderr(predicate::str::contains("not a dsserv project"));
}

#[test]
#[serial]
fn unsupported_target_fails() {
  let env = TestEnv::project();

  env
    .dscli_cmd()
    .args(["build", "-t", "darwin/386"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("unsupported target platform: darwin/386"));

  assert!(!env.path().join("dist").exists());
}

#[test]
#[serial]
fn malformed_target_fails() {
  let env = TestEnv::project();

  env
    .dscli_cmd()
    .args(["build", "-t", "linux-amd64"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("invalid target selector"));
}

#[test]
#[serial]
fn build_leaves_only_project_files_behind() {
  let env = TestEnv::project();

  env.dscli_cmd().args(["build", "-t", "linux/amd64"]).assert().success();

  let mut top_level: Vec<String> = std::fs::read_dir(env.path())
    .unwrap()
    .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
    .collect();
  top_level.sort();
  assert_eq!(top_level, vec!["bin", "cmd", "dist", "main.go", "manifest.json"]);
}

#[test]
#[serial]
fn verbose_build_logs_configuration_and_result() {
  let env = TestEnv::project();

  env
    .dscli_cmd()
    .args(["-v", "build", "-t", "linux/amd64"])
    .assert()
    .success()
    .stderr(predicate::str::contains("build configuration"))
    .stderr(predicate::str::contains("build finished"));
}

#[test]
#[serial]
fn quiet_build_keeps_debug_logs_off() {
  let env = TestEnv::project();

  env
    .dscli_cmd()
    .args(["build", "-t", "linux/amd64"])
    .assert()
    .success()
    .stderr(predicate::str::contains("build configuration").not());
}
