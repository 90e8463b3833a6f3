//! Project scaffolding.
//!
//! - [`create_project`] lays out a new dsserv module with a root entry point,
//!   `manifest.json`, and a default `.dscli.json`
//! - [`add_entry_point`] adds a `cmd/<name>/main.go` entry point to an
//!   existing project and registers its executable in the manifest

mod templates;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{Local, SecondsFormat};
use thiserror::Error;
use tracing::{debug, info};

use crate::consts::{BIN_DIR, CMD_DIR, CONFIG_FILE, ENTRY_SOURCE, MANIFEST_FILE, MANIFEST_SCHEMA_VERSION};
use crate::manifest::{Manifest, ManifestError, ManifestStore, RegisterOutcome, executable_entry};
use crate::platform::{Arch, Os};

pub use templates::{CMD_MAIN_GO, DSCLI_JSON, GITIGNORE, GO_MOD, MAIN_GO, README_MD};

pub const DEFAULT_DESCRIPTION: &str = "A dsserv module";
pub const DEFAULT_VERSION: &str = "1.0.0";
pub const DEFAULT_AUTHOR: &str = "DataShell Team";
pub const DEFAULT_LOG_DIR: &str = "./logs";

/// Directories created in every new project.
pub const PROJECT_DIRS: [&str; 5] = [CMD_DIR, "internal", "pkg", "logs", BIN_DIR];

/// Errors that can occur while scaffolding.
#[derive(Debug, Error)]
pub enum InitError {
  #[error("invalid name '{0}': must be non-empty and must not contain path separators")]
  InvalidName(String),

  #[error("project already exists: {}", path.display())]
  PathExists { path: PathBuf },

  #[error("failed to create directory {}: {source}", path.display())]
  CreateDir { path: PathBuf, source: io::Error },

  #[error("failed to write file {}: {source}", path.display())]
  WriteFile { path: PathBuf, source: io::Error },

  #[error(transparent)]
  Manifest(#[from] ManifestError),
}

/// Identity of a new project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectInfo {
  pub name: String,
  pub description: String,
  pub version: String,
  pub author: String,
}

impl ProjectInfo {
  /// A project called `name` with default description, version, and author.
  pub fn new(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      description: DEFAULT_DESCRIPTION.to_string(),
      version: DEFAULT_VERSION.to_string(),
      author: DEFAULT_AUTHOR.to_string(),
    }
  }
}

/// Result of a successful [`create_project`].
#[derive(Debug)]
pub struct CreateResult {
  pub project_dir: PathBuf,
  /// Every file written, in creation order.
  pub files: Vec<PathBuf>,
}

/// Result of a successful [`add_entry_point`].
#[derive(Debug)]
pub struct AddResult {
  /// `cmd/<name>/main.go` under the project root.
  pub source_path: PathBuf,
  /// False when the source file already existed and was left alone.
  pub created: bool,
  pub outcome: RegisterOutcome,
}

/// Check that `name` can be used as a directory and binary name.
pub fn validate_name(name: &str) -> Result<(), InitError> {
  let trimmed = name.trim();
  if trimmed.is_empty() || trimmed == "." || trimmed == ".." || trimmed.contains(['/', '\\']) || trimmed != name {
    return Err(InitError::InvalidName(name.to_string()));
  }
  Ok(())
}

/// Create a new project directory `<parent>/<info.name>`.
///
/// An existing directory is reused as long as it has no manifest yet.
///
/// # Errors
///
/// Returns an error if:
/// - the name is empty or contains path separators
/// - the directory already holds a `manifest.json`
/// - a directory or file cannot be written
pub fn create_project(parent: &Path, info: &ProjectInfo) -> Result<CreateResult, InitError> {
  validate_name(&info.name)?;

  let project_dir = parent.join(&info.name);
  let store = ManifestStore::new(&project_dir);
  if store.exists() {
    return Err(InitError::PathExists {
      path: store.path().to_path_buf(),
    });
  }

  for dir in PROJECT_DIRS {
    let path = project_dir.join(dir);
    fs::create_dir_all(&path).map_err(|e| InitError::CreateDir { path, source: e })?;
  }

  let mut files = Vec::new();
  let mut write = |relative: &str, content: String| -> Result<(), InitError> {
    let path = project_dir.join(relative);
    write_file(&path, &content)?;
    files.push(path);
    Ok(())
  };

  write("go.mod", render(GO_MOD, info))?;
  write(ENTRY_SOURCE, render(MAIN_GO, info))?;
  write("README.md", render(README_MD, info))?;
  write(".gitignore", GITIGNORE.to_string())?;
  write(CONFIG_FILE, DSCLI_JSON.to_string())?;

  let manifest = initial_manifest(info);
  store.save(&manifest)?;
  files.push(project_dir.join(MANIFEST_FILE));

  info!(project = %info.name, path = %project_dir.display(), "project created");

  Ok(CreateResult { project_dir, files })
}

/// Add an entry point `cmd/<name>/main.go` to the project at `project_root`.
///
/// An existing source file is kept. The executable is registered in the
/// manifest either way, so repeating the call changes nothing.
///
/// # Errors
///
/// Returns [`ManifestError::NotAProject`] (wrapped) when `project_root` has no
/// manifest, and I/O errors when the source cannot be written.
pub fn add_entry_point(project_root: &Path, name: &str) -> Result<AddResult, InitError> {
  validate_name(name)?;

  let store = ManifestStore::new(project_root);
  if !store.exists() {
    return Err(ManifestError::NotAProject {
      path: store.path().to_path_buf(),
    }
    .into());
  }

  let entry_dir = project_root.join(CMD_DIR).join(name);
  fs::create_dir_all(&entry_dir).map_err(|e| InitError::CreateDir {
    path: entry_dir.clone(),
    source: e,
  })?;

  let source_path = entry_dir.join(ENTRY_SOURCE);
  let created = if source_path.exists() {
    debug!(path = %source_path.display(), "entry source already exists");
    false
  } else {
    write_file(&source_path, &CMD_MAIN_GO.replace("{name}", name))?;
    true
  };

  let outcome = store.register_executable(name)?;
  info!(entry = %name, executable = %outcome.path(), "entry point added");

  Ok(AddResult {
    source_path,
    created,
    outcome,
  })
}

fn initial_manifest(info: &ProjectInfo) -> Manifest {
  Manifest {
    name: info.name.clone(),
    description: info.description.clone(),
    version: info.version.clone(),
    manifest_version: MANIFEST_SCHEMA_VERSION,
    author: info.author.clone(),
    build_date: Local::now().to_rfc3339_opts(SecondsFormat::Secs, true),
    os: Os::Linux.to_string(),
    arch: Arch::Amd64.to_string(),
    log_dir: DEFAULT_LOG_DIR.to_string(),
    executable: vec![executable_entry(&info.name)],
    extra: serde_json::Map::new(),
  }
}

fn render(template: &str, info: &ProjectInfo) -> String {
  template
    .replace("{name}", &info.name)
    .replace("{description}", &info.description)
    .replace("{version}", &info.version)
    .replace("{author}", &info.author)
}

fn write_file(path: &Path, content: &str) -> Result<(), InitError> {
  fs::write(path, content).map_err(|e| InitError::WriteFile {
    path: path.to_path_buf(),
    source: e,
  })
}
