//! Entry-point discovery.
//!
//! The project root is an entry point when it holds an entry source file
//! directly. Each immediate child of `cmd/` holding an entry source file is
//! another one. Entry points are recomputed on every run.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};

use crate::consts::{CMD_DIR, ENTRY_SOURCE};

#[derive(Debug, Error)]
pub enum DiscoverError {
  #[error("failed to read {}: {source}", path.display())]
  ReadDir { path: PathBuf, source: io::Error },
}

/// A buildable unit producing exactly one binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryPoint {
  /// Binary base name: the project name for the root, else the directory name.
  pub name: String,
  /// Source path relative to the project root, as passed to the compiler
  /// (`.` or `./cmd/<name>`).
  pub source: String,
}

impl EntryPoint {
  pub fn is_root(&self) -> bool {
    self.source == "."
  }
}

/// Discover all entry points under `project_root`.
///
/// The root entry point (if any) comes first, followed by command entry
/// points in lexicographic order. A missing `cmd/` directory is not an error.
pub fn discover(project_root: &Path, project_name: &str) -> Result<Vec<EntryPoint>, DiscoverError> {
  let mut entries = Vec::new();

  if project_root.join(ENTRY_SOURCE).is_file() {
    entries.push(EntryPoint {
      name: project_name.to_string(),
      source: ".".to_string(),
    });
  }

  for name in discover_commands(project_root)? {
    if name == project_name && !entries.is_empty() {
      warn!(name = %name, "command entry point shares the project name, skipping");
      continue;
    }
    entries.push(EntryPoint {
      source: format!("./{}/{}", CMD_DIR, name),
      name,
    });
  }

  debug!(count = entries.len(), "discovered entry points");
  Ok(entries)
}

/// Names of the immediate `cmd/` subdirectories containing an entry source file.
fn discover_commands(project_root: &Path) -> Result<Vec<String>, DiscoverError> {
  let cmd_dir = project_root.join(CMD_DIR);

  let read_dir = match fs::read_dir(&cmd_dir) {
    Ok(read_dir) => read_dir,
    Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
    Err(e) => return Err(DiscoverError::ReadDir { path: cmd_dir, source: e }),
  };

  let mut names = Vec::new();
  for entry in read_dir {
    let entry = entry.map_err(|e| DiscoverError::ReadDir {
      path: cmd_dir.clone(),
      source: e,
    })?;
    let path = entry.path();
    if !path.is_dir() || !path.join(ENTRY_SOURCE).is_file() {
      continue;
    }
    match entry.file_name().into_string() {
      Ok(name) => names.push(name),
      Err(name) => warn!(name = ?name, "skipping entry point with a non UTF-8 name"),
    }
  }

  names.sort();
  Ok(names)
}
