//! Reading and writing `manifest.json`.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use super::types::{Manifest, RegisterOutcome};
use crate::consts::MANIFEST_FILE;
use crate::platform::Target;

/// Errors from manifest I/O.
#[derive(Debug, Error)]
pub enum ManifestError {
  #[error("not a dsserv project: {} not found", path.display())]
  NotAProject { path: PathBuf },

  #[error("corrupt manifest {}: {source}", path.display())]
  CorruptManifest { path: PathBuf, source: serde_json::Error },

  #[error("failed to read {}: {source}", path.display())]
  Read { path: PathBuf, source: io::Error },

  #[error("failed to write {}: {source}", path.display())]
  Write { path: PathBuf, source: io::Error },

  #[error("failed to serialize manifest: {0}")]
  Serialize(#[source] serde_json::Error),
}

/// Manifest file of one project.
#[derive(Debug, Clone)]
pub struct ManifestStore {
  path: PathBuf,
}

impl ManifestStore {
  /// Store for the manifest at the root of `project_root`.
  pub fn new(project_root: &Path) -> Self {
    Self {
      path: project_root.join(MANIFEST_FILE),
    }
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  /// Whether the project root holds a manifest at all.
  pub fn exists(&self) -> bool {
    self.path.is_file()
  }

  /// Load and parse the manifest.
  pub fn load(&self) -> Result<Manifest, ManifestError> {
    let content = fs::read_to_string(&self.path).map_err(|e| {
      if e.kind() == io::ErrorKind::NotFound {
        ManifestError::NotAProject {
          path: self.path.clone(),
        }
      } else {
        ManifestError::Read {
          path: self.path.clone(),
          source: e,
        }
      }
    })?;

    serde_json::from_str(&content).map_err(|e| ManifestError::CorruptManifest {
      path: self.path.clone(),
      source: e,
    })
  }

  /// Write the manifest, replacing the previous file atomically.
  pub fn save(&self, manifest: &Manifest) -> Result<(), ManifestError> {
    let content = manifest.to_json_pretty().map_err(ManifestError::Serialize)?;
    let temp_path = self.path.with_extension("json.tmp");

    let write_err = |source| ManifestError::Write {
      path: self.path.clone(),
      source,
    };
    fs::write(&temp_path, content).map_err(write_err)?;
    fs::rename(&temp_path, &self.path).map_err(write_err)?;

    debug!(path = %self.path.display(), "manifest saved");
    Ok(())
  }

  /// Register `name` as an executable and persist the change.
  ///
  /// Nothing is written when the path is already listed.
  pub fn register_executable(&self, name: &str) -> Result<RegisterOutcome, ManifestError> {
    let mut manifest = self.load()?;
    let outcome = manifest.register_executable(name);
    if let RegisterOutcome::Added(_) = outcome {
      self.save(&manifest)?;
    }
    Ok(outcome)
  }

  /// Record a completed target build and persist it.
  ///
  /// Returns the manifest exactly as written, for inclusion in the archive.
  pub fn record_build(&self, target: Target, build_date: &str, binaries: &[String]) -> Result<Manifest, ManifestError> {
    let mut manifest = self.load()?;
    manifest.record_build(target, build_date, binaries);
    self.save(&manifest)?;
    Ok(manifest)
  }
}
