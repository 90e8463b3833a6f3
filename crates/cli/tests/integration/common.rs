//! Shared test helpers for CLI integration tests.

use std::fs::File;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use flate2::read::GzDecoder;
use tempfile::TempDir;

/// Stand-in for `go build`.
///
/// Writes `<GOOS>/<GOARCH> <source>` to the `-o` path. Fails for sources
/// containing `broken`, and for every source when `GOOS` equals
/// `$FAKE_GO_FAIL_OS`.
#[cfg(unix)]
const FAKE_GO: &str = r#"#!/bin/sh
out=""
src=""
while [ $# -gt 0 ]; do
  case "$1" in
    -o) out="$2"; shift ;;
    *) src="$1" ;;
  esac
  shift
done
case "$src" in
  *broken*) echo "syntax error in $src" >&2; exit 1 ;;
esac
if [ -n "$FAKE_GO_FAIL_OS" ] && [ "$GOOS" = "$FAKE_GO_FAIL_OS" ]; then
  echo "unsupported on $GOOS" >&2
  exit 2
fi
printf '%s/%s %s' "$GOOS" "$GOARCH" "$src" > "$out"
"#;

/// Isolated project directory with a fake compiler kept in a sibling directory.
pub struct TestEnv {
  pub temp: TempDir,
  tools: TempDir,
}

impl TestEnv {
  /// An empty directory.
  pub fn empty() -> Self {
    Self {
      temp: TempDir::new().unwrap(),
      tools: TempDir::new().unwrap(),
    }
  }

  /// A project named `demo` with a root entry point and a `worker` command.
  pub fn project() -> Self {
    let env = Self::empty();
    env.write_file(
      "manifest.json",
      r#"{
  "name": "demo",
  "description": "A dsserv module",
  "version": "1.0.0",
  "manifest_version": 1,
  "author": "DataShell Team",
  "os": "linux",
  "arch": "amd64",
  "log_dir": "./logs",
  "executable": ["./bin/demo"]
}"#,
    );
    env.write_file("main.go", "package main\n");
    env.write_file("cmd/worker/main.go", "package main\n");
    env
  }

  pub fn path(&self) -> PathBuf {
    dunce::canonicalize(self.temp.path()).unwrap()
  }

  /// Write a file relative to the temp directory.
  pub fn write_file(&self, relative_path: &str, content: &str) {
    let path = self.temp.path().join(relative_path);
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
  }

  pub fn read_file(&self, relative_path: &str) -> String {
    std::fs::read_to_string(self.temp.path().join(relative_path)).unwrap()
  }

  /// Path of the fake compiler, written on first use outside the project tree.
  #[cfg(unix)]
  fn fake_go(&self) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = self.tools.path().join("go");
    if !path.exists() {
      std::fs::write(&path, FAKE_GO).unwrap();
      std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    }
    path
  }

  /// Get a Command for the dscli binary running inside the project.
  ///
  /// On Unix, `DSCLI_GO` points at the fake compiler.
  pub fn dscli_cmd(&self) -> Command {
    let mut cmd: Command = cargo_bin_cmd!("dscli");
    cmd.current_dir(self.temp.path());
    cmd.env_remove("RUST_LOG");
    cmd.env_remove("FAKE_GO_FAIL_OS");
    #[cfg(unix)]
    cmd.env("DSCLI_GO", self.fake_go());
    cmd
  }
}

/// Entry names and contents of a `.tar.gz`, directory names without a trailing `/`.
pub fn archive_entries(path: &Path) -> Vec<(String, String)> {
  let mut archive = tar::Archive::new(GzDecoder::new(File::open(path).unwrap()));
  archive
    .entries()
    .unwrap()
    .map(|entry| {
      let mut entry = entry.unwrap();
      let name = entry.path().unwrap().to_string_lossy().trim_end_matches('/').to_string();
      let mut content = String::new();
      std::io::Read::read_to_string(&mut entry, &mut content).unwrap();
      (name, content)
    })
    .collect()
}

pub fn archive_names(path: &Path) -> Vec<String> {
  archive_entries(path).into_iter().map(|(name, _)| name).collect()
}
