//! Manifest data model.
//!
//! Keys this crate does not know about are kept in [`Manifest::extra`] so a
//! read-modify-write cycle never drops fields added by other tools.

use serde::{Deserialize, Serialize};

use crate::consts::BIN_DIR;
use crate::platform::{Os, Target};

/// The persisted identity and last-build record of a project.
///
/// # Example
///
/// ```json
/// {
///   "name": "demo",
///   "description": "A dsserv module",
///   "version": "1.0.0",
///   "manifest_version": 1,
///   "author": "DataShell Team",
///   "build_date": "2024-05-01T10:00:00+00:00",
///   "os": "linux",
///   "arch": "amd64",
///   "log_dir": "./logs",
///   "executable": ["./bin/demo"]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
  pub name: String,
  #[serde(default)]
  pub description: String,
  #[serde(default)]
  pub version: String,
  #[serde(default)]
  pub manifest_version: u32,
  #[serde(default)]
  pub author: String,
  #[serde(default)]
  pub build_date: String,
  #[serde(default)]
  pub os: String,
  #[serde(default)]
  pub arch: String,
  #[serde(default)]
  pub log_dir: String,
  #[serde(default)]
  pub executable: Vec<String>,
  #[serde(flatten)]
  pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Outcome of registering an executable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegisterOutcome {
  /// The path was appended to the executable list.
  Added(String),
  /// An identical path was already listed; nothing changed.
  AlreadyPresent(String),
}

impl RegisterOutcome {
  pub fn path(&self) -> &str {
    match self {
      Self::Added(path) | Self::AlreadyPresent(path) => path,
    }
  }
}

/// Manifest path of a binary, e.g. `./bin/svc`.
pub fn executable_entry(binary_name: &str) -> String {
  format!("./{}/{}", BIN_DIR, binary_name)
}

impl Manifest {
  /// The manifest path for `name` under the manifest's current OS field.
  ///
  /// An unrecognized OS field gets no executable suffix.
  pub fn executable_path(&self, name: &str) -> String {
    let suffix = self.os.parse::<Os>().map(|os| os.exe_suffix()).unwrap_or("");
    executable_entry(&format!("{}{}", name, suffix))
  }

  /// Append `name` to the executable list unless the same path is already listed.
  pub fn register_executable(&mut self, name: &str) -> RegisterOutcome {
    let path = self.executable_path(name);
    if self.executable.iter().any(|existing| *existing == path) {
      return RegisterOutcome::AlreadyPresent(path);
    }
    self.executable.push(path.clone());
    RegisterOutcome::Added(path)
  }

  /// Record a completed target build.
  ///
  /// Overwrites OS, architecture, and build date, and replaces the executable
  /// list with exactly `binaries` (file names under the binary directory).
  pub fn record_build(&mut self, target: Target, build_date: &str, binaries: &[String]) {
    self.os = target.os.to_string();
    self.arch = target.arch.to_string();
    self.build_date = build_date.to_string();

    self.executable.clear();
    for binary in binaries {
      let path = executable_entry(binary);
      if !self.executable.contains(&path) {
        self.executable.push(path);
      }
    }
  }

  /// Pretty JSON as written to disk and into archives.
  pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(self)
  }
}
