//! Build orchestration.
//!
//! A run resolves its targets up front, then builds them one at a time:
//!
//! 1. discover entry points
//! 2. compile each entry point (failures are recorded, siblings continue)
//! 3. record the build in `manifest.json`
//! 4. package binaries, manifest, and assets into the target's archive
//! 5. remove the staged binaries
//!
//! A target failing at any step is reported and skipped; the run continues
//! with the next target. Only a missing or corrupt manifest, a bad selector,
//! or an unusable output directory aborts the run.

mod types;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{Local, SecondsFormat};
use tracing::{info, warn};

pub use types::*;

use crate::archive::{ArchiveContents, archive_file_name, package};
use crate::assets::{Asset, ExcludeSet, resolve_assets};
use crate::compile::{CompileError, CompiledBinary, Compiler, compile_entry};
use crate::config::BuildConfig;
use crate::consts::BIN_DIR;
use crate::discover::discover;
use crate::manifest::ManifestStore;
use crate::platform::{Target, resolve_targets};

/// Per-run state shared by every target.
struct BuildContext<'a> {
  project_root: PathBuf,
  project_name: String,
  store: ManifestStore,
  bin_dir: PathBuf,
  output_dir: PathBuf,
  assets: Vec<Asset>,
  excludes: ExcludeSet,
  compiler: &'a dyn Compiler,
  events: &'a dyn BuildEvents,
}

/// Build and package every target selected by `options.selector`.
///
/// # Errors
///
/// Returns an error only for failures that stop the whole run: the project
/// has no manifest or it cannot be parsed, the selector is malformed or names
/// an unsupported target, or the output/binary directories cannot be prepared.
/// Per-target failures are reported in the returned [`BuildReport`].
pub fn run_build(
  options: &BuildOptions,
  config: &BuildConfig,
  compiler: &dyn Compiler,
  events: &dyn BuildEvents,
) -> Result<BuildReport, BuildError> {
  let manifest = ManifestStore::new(&options.project_root).load()?;
  let targets = resolve_targets(&options.selector)?;

  // The compiler runs inside the project root, so every path derived from it must be absolute.
  let project_root = dunce::canonicalize(&options.project_root).map_err(|e| BuildError::PrepareDir {
    path: options.project_root.clone(),
    source: e,
  })?;
  let store = ManifestStore::new(&project_root);

  info!(project = %manifest.name, targets = targets.len(), "starting build");

  let assets = resolve_assets(&config.assets).unwrap_or_else(|e| {
    warn!(error = %e, "ignoring asset declarations");
    events.warning(&format!("{}; packaging without assets", e));
    Vec::new()
  });

  let output_dir = project_root.join(&config.output_dir);
  reset_output_dir(&project_root, &output_dir)?;

  let bin_dir = project_root.join(BIN_DIR);
  fs::create_dir_all(&bin_dir).map_err(|e| BuildError::PrepareDir {
    path: bin_dir.clone(),
    source: e,
  })?;

  let ctx = BuildContext {
    project_root,
    project_name: manifest.name,
    store,
    bin_dir,
    output_dir,
    assets,
    excludes: ExcludeSet::new(&config.excludes),
    compiler,
    events,
  };

  let mut reports = Vec::with_capacity(targets.len());
  for target in targets {
    events.target_started(target);
    let report = build_target(&ctx, target);

    match &report.outcome {
      Ok(summary) => events.target_packaged(target, summary),
      Err(failure) => {
        warn!(target = %target, error = %failure, "target skipped");
        events.target_skipped(target, failure);
      }
    }
    reports.push(report);
  }

  Ok(BuildReport {
    project_name: ctx.project_name,
    output_dir: ctx.output_dir,
    targets: reports,
  })
}

/// Delete and recreate the output directory.
///
/// Refuses any directory that is the project root or one of its ancestors.
fn reset_output_dir(project_root: &Path, output_dir: &Path) -> Result<(), BuildError> {
  let prepare_err = |source| BuildError::PrepareDir {
    path: output_dir.to_path_buf(),
    source,
  };

  let root = dunce::canonicalize(project_root).map_err(prepare_err)?;
  if output_dir.exists() {
    let resolved = dunce::canonicalize(output_dir).map_err(prepare_err)?;
    if root.starts_with(&resolved) {
      return Err(BuildError::InvalidOutputDir {
        path: output_dir.to_path_buf(),
      });
    }
    fs::remove_dir_all(output_dir).map_err(prepare_err)?;
  }

  fs::create_dir_all(output_dir).map_err(prepare_err)
}

fn build_target(ctx: &BuildContext<'_>, target: Target) -> TargetReport {
  let now = Local::now();
  let build_date = now.to_rfc3339_opts(SecondsFormat::Secs, true);
  let mtime = now.timestamp().max(0) as u64;
  let mut binaries: Vec<CompiledBinary> = Vec::new();
  let mut compile_failures = Vec::new();

  info!(target = %target, "building target");

  let outcome = compile_and_package(ctx, target, &build_date, mtime, &mut binaries, &mut compile_failures);

  clean_binaries(&binaries);

  TargetReport {
    target,
    binaries: binaries.into_iter().map(|b| b.name).collect(),
    compile_failures,
    outcome,
  }
}

fn compile_and_package(
  ctx: &BuildContext<'_>,
  target: Target,
  build_date: &str,
  mtime: u64,
  binaries: &mut Vec<CompiledBinary>,
  compile_failures: &mut Vec<(String, CompileError)>,
) -> Result<ArchiveSummary, TargetFailure> {
  let entries = discover(&ctx.project_root, &ctx.project_name)?;

  for entry in &entries {
    match compile_entry(ctx.compiler, &ctx.project_root, &ctx.bin_dir, entry, target, build_date) {
      Ok(binary) => {
        ctx.events.entry_compiled(target, entry, &binary);
        binaries.push(binary);
      }
      Err(e) => {
        warn!(entry = %entry.name, target = %target, error = %e, "compile failed");
        ctx.events.entry_failed(target, entry, &e);
        compile_failures.push((entry.name.clone(), e));
      }
    }
  }

  if binaries.is_empty() {
    return Err(TargetFailure::NoArtifactsProduced);
  }

  let names: Vec<String> = binaries.iter().map(|b| b.name.clone()).collect();
  let snapshot = ctx
    .store
    .record_build(target, build_date, &names)
    .map_err(TargetFailure::Manifest)?;

  let archive_path = ctx.output_dir.join(archive_file_name(&ctx.project_name, target));
  let contents = ArchiveContents {
    project_root: &ctx.project_root,
    manifest: &snapshot,
    binaries: binaries.as_slice(),
    assets: &ctx.assets,
    excludes: &ctx.excludes,
    mtime,
  };
  let path = package(&archive_path, &contents)?;
  let size = fs::metadata(&path).map(|m| m.len()).unwrap_or(0);

  Ok(ArchiveSummary { path, size })
}

/// Remove staged binaries so the next target starts from an empty staging area.
fn clean_binaries(binaries: &[CompiledBinary]) {
  for binary in binaries {
    if let Err(e) = fs::remove_file(&binary.path)
      && e.kind() != io::ErrorKind::NotFound
    {
      warn!(path = %binary.path.display(), error = %e, "failed to remove staged binary");
    }
  }
}
