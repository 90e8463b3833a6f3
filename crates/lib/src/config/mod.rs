//! Project-local packaging configuration (`.dscli.json`).
//!
//! The file is optional. A missing or malformed file yields the default
//! configuration, so a build never fails because of it.

use std::fs;
use std::io;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::consts::{CONFIG_FILE, DEFAULT_OUTPUT_DIR};

/// Packaging policy loaded once per invocation.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
  /// Raw asset declarations; decoded by [`crate::assets::resolve_assets`].
  pub assets: serde_json::Value,
  /// Glob patterns removing paths from packaging.
  pub excludes: Vec<String>,
  /// Directory receiving the archives, relative to the project root.
  pub output_dir: String,
}

impl Default for BuildConfig {
  fn default() -> Self {
    Self {
      assets: serde_json::Value::Array(Vec::new()),
      excludes: Vec::new(),
      output_dir: DEFAULT_OUTPUT_DIR.to_string(),
    }
  }
}

impl BuildConfig {
  /// Load `.dscli.json` from `project_root`, falling back to defaults.
  pub fn load(project_root: &Path) -> Self {
    let path = project_root.join(CONFIG_FILE);

    let content = match fs::read_to_string(&path) {
      Ok(content) => content,
      Err(e) if e.kind() == io::ErrorKind::NotFound => {
        debug!(path = %path.display(), "no build configuration, using defaults");
        return Self::default();
      }
      Err(e) => {
        warn!(path = %path.display(), error = %e, "failed to read build configuration, using defaults");
        return Self::default();
      }
    };

    Self::parse(&content).unwrap_or_else(|e| {
      warn!(path = %path.display(), error = %e, "failed to parse build configuration, using defaults");
      Self::default()
    })
  }

  /// Parse configuration JSON. Missing fields take their defaults.
  pub fn parse(content: &str) -> Result<Self, serde_json::Error> {
    let mut config: Self = serde_json::from_str(content)?;
    if config.output_dir.trim().is_empty() {
      config.output_dir = DEFAULT_OUTPUT_DIR.to_string();
    }
    Ok(config)
  }
}
