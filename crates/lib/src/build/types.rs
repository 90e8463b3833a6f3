//! Options, errors, and reports for a build run.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::archive::ArchiveError;
use crate::compile::{CompileError, CompiledBinary};
use crate::discover::{DiscoverError, EntryPoint};
use crate::manifest::ManifestError;
use crate::platform::{Target, TargetError};

/// Inputs of a build run.
#[derive(Debug, Clone)]
pub struct BuildOptions {
  /// Directory holding `manifest.json`.
  pub project_root: PathBuf,
  /// `""` for the host, `"all"`, or `"<os>/<arch>"`.
  pub selector: String,
}

/// Errors that abort the whole run before any target is built.
#[derive(Debug, Error)]
pub enum BuildError {
  #[error(transparent)]
  Manifest(#[from] ManifestError),

  #[error(transparent)]
  Target(#[from] TargetError),

  #[error("output directory {} would contain the project root", path.display())]
  InvalidOutputDir { path: PathBuf },

  #[error("failed to prepare directory {}: {source}", path.display())]
  PrepareDir { path: PathBuf, source: io::Error },
}

/// Why a single target produced no archive. Other targets still run.
#[derive(Debug, Error)]
pub enum TargetFailure {
  #[error("failed to discover entry points: {0}")]
  Discover(#[from] DiscoverError),

  #[error("no executables were built successfully")]
  NoArtifactsProduced,

  #[error("failed to update manifest: {0}")]
  Manifest(#[source] ManifestError),

  #[error("failed to create package: {0}")]
  Archive(#[from] ArchiveError),
}

/// A produced archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveSummary {
  pub path: PathBuf,
  pub size: u64,
}

/// What happened to one target.
#[derive(Debug)]
pub struct TargetReport {
  pub target: Target,
  /// Binary file names compiled for this target.
  pub binaries: Vec<String>,
  /// Entry points that failed to compile, by entry name.
  pub compile_failures: Vec<(String, CompileError)>,
  pub outcome: Result<ArchiveSummary, TargetFailure>,
}

/// Result of a whole run.
#[derive(Debug)]
pub struct BuildReport {
  pub project_name: String,
  pub output_dir: PathBuf,
  pub targets: Vec<TargetReport>,
}

impl BuildReport {
  /// Archives produced, in target order.
  pub fn archives(&self) -> impl Iterator<Item = (Target, &ArchiveSummary)> {
    self
      .targets
      .iter()
      .filter_map(|report| report.outcome.as_ref().ok().map(|summary| (report.target, summary)))
  }

  /// Targets that produced no archive.
  pub fn skipped(&self) -> impl Iterator<Item = (Target, &TargetFailure)> {
    self
      .targets
      .iter()
      .filter_map(|report| report.outcome.as_ref().err().map(|failure| (report.target, failure)))
  }

  /// True when every target produced an archive.
  pub fn is_success(&self) -> bool {
    self.targets.iter().all(|report| report.outcome.is_ok())
  }
}

/// Progress notifications emitted while a run is in flight.
///
/// All methods default to doing nothing.
pub trait BuildEvents {
  fn target_started(&self, _target: Target) {}

  fn entry_compiled(&self, _target: Target, _entry: &EntryPoint, _binary: &CompiledBinary) {}

  fn entry_failed(&self, _target: Target, _entry: &EntryPoint, _error: &CompileError) {}

  fn target_packaged(&self, _target: Target, _archive: &ArchiveSummary) {}

  fn target_skipped(&self, _target: Target, _failure: &TargetFailure) {}

  /// A non-fatal problem not tied to one target, e.g. an invalid asset declaration.
  fn warning(&self, _message: &str) {}
}

/// [`BuildEvents`] that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoEvents;

impl BuildEvents for NoEvents {}
