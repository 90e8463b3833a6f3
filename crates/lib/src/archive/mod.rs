//! Per-target archive assembly.
//!
//! Entries are written in a fixed order:
//!
//! ```text
//! bin/                 # directory entry
//! bin/<binary>...      # every binary built for the target
//! manifest.json        # manifest as saved after the target's build
//! <asset output>...    # resolved, non-excluded assets
//! ```

use std::fs::{self, File};
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use flate2::Compression;
use flate2::write::GzEncoder;
use tar::{Builder, EntryType, Header};
use thiserror::Error;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::assets::{Asset, ExcludeSet};
use crate::compile::CompiledBinary;
use crate::consts::{BIN_DIR, MANIFEST_FILE};
use crate::manifest::Manifest;
use crate::platform::Target;

const EXECUTABLE_MODE: u32 = 0o755;
const FILE_MODE: u32 = 0o644;

/// Errors while writing an archive. The partial archive is removed.
#[derive(Debug, Error)]
pub enum ArchiveError {
  #[error("failed to create archive {}: {source}", path.display())]
  Create { path: PathBuf, source: io::Error },

  #[error("failed to add {} to archive: {source}", path.display())]
  AddEntry { path: PathBuf, source: io::Error },

  #[error("failed to walk asset directory {}: {source}", path.display())]
  Walk { path: PathBuf, source: walkdir::Error },

  #[error("failed to serialize manifest: {0}")]
  Manifest(#[source] serde_json::Error),

  #[error("failed to finish archive {}: {source}", path.display())]
  Finish { path: PathBuf, source: io::Error },
}

/// What goes into one target's archive.
#[derive(Debug, Clone, Copy)]
pub struct ArchiveContents<'a> {
  /// Asset sources are resolved relative to this directory.
  pub project_root: &'a Path,
  pub manifest: &'a Manifest,
  pub binaries: &'a [CompiledBinary],
  pub assets: &'a [Asset],
  pub excludes: &'a ExcludeSet,
  /// Modification time (seconds since the epoch) for generated entries.
  pub mtime: u64,
}

/// Archive file name for a project and target, e.g. `demo_linux_amd64.tar.gz`.
pub fn archive_file_name(project_name: &str, target: Target) -> String {
  format!("{}_{}_{}.tar.gz", project_name, target.os, target.arch)
}

/// Whether an archive entry gets executable permissions.
///
/// True for `.exe` files and for paths with no `.` anywhere in them, so
/// `config.d/run` and dotfiles such as `.env` stay non-executable.
pub fn is_executable_entry(archive_path: &str) -> bool {
  archive_path.ends_with(".exe") || (archive_path != MANIFEST_FILE && !archive_path.contains('.'))
}

/// Write the archive for one target to `archive_path`.
///
/// Missing and excluded assets are skipped with a warning. Any I/O failure
/// aborts the archive and deletes the partially written file.
pub fn package(archive_path: &Path, contents: &ArchiveContents<'_>) -> Result<PathBuf, ArchiveError> {
  match write_archive(archive_path, contents) {
    Ok(()) => {
      info!(path = %archive_path.display(), "archive written");
      Ok(archive_path.to_path_buf())
    }
    Err(e) => {
      if let Err(remove_err) = fs::remove_file(archive_path)
        && remove_err.kind() != io::ErrorKind::NotFound
      {
        warn!(path = %archive_path.display(), error = %remove_err, "failed to remove partial archive");
      }
      Err(e)
    }
  }
}

fn write_archive(archive_path: &Path, contents: &ArchiveContents<'_>) -> Result<(), ArchiveError> {
  let file = File::create(archive_path).map_err(|e| ArchiveError::Create {
    path: archive_path.to_path_buf(),
    source: e,
  })?;
  let mut builder = Builder::new(GzEncoder::new(BufWriter::new(file), Compression::default()));

  let bin_dir = format!("{}/", BIN_DIR);
  let mut header = new_header(EntryType::Directory, 0, EXECUTABLE_MODE, contents.mtime);
  builder
    .append_data(&mut header, &bin_dir, io::empty())
    .map_err(|e| ArchiveError::AddEntry {
      path: PathBuf::from(&bin_dir),
      source: e,
    })?;

  for binary in contents.binaries {
    let entry_path = format!("{}/{}", BIN_DIR, binary.name);
    append_file(&mut builder, &binary.path, &entry_path, EXECUTABLE_MODE, contents.mtime)?;
  }

  let manifest = contents.manifest.to_json_pretty().map_err(ArchiveError::Manifest)?;
  let mut header = new_header(EntryType::Regular, manifest.len() as u64, FILE_MODE, contents.mtime);
  builder
    .append_data(&mut header, MANIFEST_FILE, manifest.as_bytes())
    .map_err(|e| ArchiveError::AddEntry {
      path: PathBuf::from(MANIFEST_FILE),
      source: e,
    })?;

  for asset in contents.assets {
    append_asset(&mut builder, asset, contents)?;
  }

  let finish_err = |source| ArchiveError::Finish {
    path: archive_path.to_path_buf(),
    source,
  };
  let encoder = builder.into_inner().map_err(finish_err)?;
  let mut writer = encoder.finish().map_err(finish_err)?;
  writer.flush().map_err(finish_err)?;
  Ok(())
}

fn append_asset<W: Write>(
  builder: &mut Builder<W>,
  asset: &Asset,
  contents: &ArchiveContents<'_>,
) -> Result<(), ArchiveError> {
  if contents.excludes.is_excluded(&asset.source) {
    info!(asset = %asset.source, "skipping excluded asset");
    return Ok(());
  }

  let source = contents.project_root.join(&asset.source);
  let metadata = match fs::metadata(&source) {
    Ok(metadata) => metadata,
    Err(e) => {
      warn!(asset = %asset.source, error = %e, "asset not found, skipping");
      return Ok(());
    }
  };

  let output = normalize_entry_path(&asset.output);
  if !metadata.is_dir() {
    let mode = entry_mode(&output);
    return append_file(builder, &source, &output, mode, contents.mtime);
  }

  let walker = WalkDir::new(&source)
    .sort_by_file_name()
    .into_iter()
    .filter_entry(|entry| {
      if entry.depth() == 0 {
        return true;
      }
      let candidate = relative_display(contents.project_root, entry.path());
      let excluded = contents.excludes.is_excluded(&candidate);
      if excluded {
        info!(path = %candidate, "skipping excluded path");
      }
      !excluded
    });

  for entry in walker {
    let entry = entry.map_err(|e| ArchiveError::Walk {
      path: source.clone(),
      source: e,
    })?;
    if !entry.path().is_file() {
      continue;
    }

    let relative = entry.path().strip_prefix(&source).unwrap_or(entry.path());
    let entry_path = join_entry_path(&output, &relative.to_string_lossy());
    let mode = entry_mode(&entry_path);
    append_file(builder, entry.path(), &entry_path, mode, contents.mtime)?;
  }

  Ok(())
}

fn append_file<W: Write>(
  builder: &mut Builder<W>,
  source: &Path,
  entry_path: &str,
  mode: u32,
  fallback_mtime: u64,
) -> Result<(), ArchiveError> {
  let add_err = |e| ArchiveError::AddEntry {
    path: source.to_path_buf(),
    source: e,
  };

  let file = File::open(source).map_err(add_err)?;
  let metadata = file.metadata().map_err(add_err)?;
  let mtime = metadata
    .modified()
    .ok()
    .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
    .map(|d| d.as_secs())
    .unwrap_or(fallback_mtime);

  let mut header = new_header(EntryType::Regular, metadata.len(), mode, mtime);
  builder
    .append_data(&mut header, entry_path, file.take(metadata.len()))
    .map_err(add_err)?;

  debug!(source = %source.display(), entry = %entry_path, "added archive entry");
  Ok(())
}

fn new_header(entry_type: EntryType, size: u64, mode: u32, mtime: u64) -> Header {
  let mut header = Header::new_gnu();
  header.set_entry_type(entry_type);
  header.set_size(size);
  header.set_mode(mode);
  header.set_mtime(mtime);
  header
}

fn entry_mode(entry_path: &str) -> u32 {
  if is_executable_entry(entry_path) {
    EXECUTABLE_MODE
  } else {
    FILE_MODE
  }
}

/// Forward slashes, no leading `./` or `/`, no trailing `/`.
fn normalize_entry_path(path: &str) -> String {
  let path = path.replace('\\', "/");
  let mut trimmed = path.as_str();
  while let Some(rest) = trimmed.strip_prefix("./") {
    trimmed = rest;
  }
  trimmed.trim_start_matches('/').trim_end_matches('/').to_string()
}

fn join_entry_path(base: &str, relative: &str) -> String {
  let relative = normalize_entry_path(relative);
  if base.is_empty() || base == "." {
    relative
  } else {
    format!("{}/{}", base, relative)
  }
}

/// `path` relative to `root` with forward slashes, for exclusion checks.
fn relative_display(root: &Path, path: &Path) -> String {
  path
    .strip_prefix(root)
    .unwrap_or(path)
    .to_string_lossy()
    .replace('\\', "/")
}
