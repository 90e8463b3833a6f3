//! Implementation of the `dscli build` command.
//!
//! Builds every entry point of the project for the selected targets and
//! packages one archive per target into the configured output directory.

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use owo_colors::{OwoColorize, Stream};
use serde::Serialize;
use tracing::{debug, info};

use dscli_lib::build::{ArchiveSummary, BuildEvents, BuildOptions, BuildReport, NoEvents, TargetFailure, run_build};
use dscli_lib::compile::{CompileError, CompiledBinary, GoToolchain};
use dscli_lib::config::BuildConfig;
use dscli_lib::discover::EntryPoint;
use dscli_lib::platform::Target;

use crate::output::{
  OutputFormat, format_bytes, format_counts, format_duration, print_archive_row, print_compile_failure,
  print_compiled_entry, print_error, print_heading, print_info, print_json, print_skipped_row, print_stat,
  print_success, print_warning,
};

/// Prints per-target progress as the build runs.
struct ConsoleEvents;

impl BuildEvents for ConsoleEvents {
  fn target_started(&self, target: Target) {
    println!();
    print_info(&format!("Building {}", target.if_supports_color(Stream::Stdout, |t| t.bold())));
  }

  fn entry_compiled(&self, _target: Target, entry: &EntryPoint, binary: &CompiledBinary) {
    print_compiled_entry(&entry.name, &binary.name);
  }

  fn entry_failed(&self, _target: Target, entry: &EntryPoint, error: &CompileError) {
    print_error(&format!("  {} failed: {}", entry.name, error));
  }

  fn target_packaged(&self, _target: Target, archive: &ArchiveSummary) {
    print_success(&format!(
      "Packaged {} ({})",
      archive.path.display(),
      format_bytes(archive.size)
    ));
  }

  fn target_skipped(&self, target: Target, failure: &TargetFailure) {
    print_warning(&format!("Skipping {}: {}", target, failure));
  }

  fn warning(&self, message: &str) {
    print_warning(message);
  }
}

#[derive(Serialize)]
struct BuildOutput {
  project: String,
  output_dir: String,
  archives: Vec<ArchiveOutput>,
  skipped: Vec<SkippedOutput>,
  compile_failures: Vec<CompileFailureOutput>,
}

#[derive(Serialize)]
struct ArchiveOutput {
  target: String,
  path: String,
  size: u64,
}

#[derive(Serialize)]
struct SkippedOutput {
  target: String,
  reason: String,
}

#[derive(Serialize)]
struct CompileFailureOutput {
  target: String,
  entry: String,
  error: String,
}

impl From<&BuildReport> for BuildOutput {
  fn from(report: &BuildReport) -> Self {
    Self {
      project: report.project_name.clone(),
      output_dir: report.output_dir.display().to_string(),
      archives: report
        .archives()
        .map(|(target, archive)| ArchiveOutput {
          target: target.to_string(),
          path: archive.path.display().to_string(),
          size: archive.size,
        })
        .collect(),
      skipped: report
        .skipped()
        .map(|(target, failure)| SkippedOutput {
          target: target.to_string(),
          reason: failure.to_string(),
        })
        .collect(),
      compile_failures: report
        .targets
        .iter()
        .flat_map(|t| {
          t.compile_failures.iter().map(move |(entry, error)| CompileFailureOutput {
            target: t.target.to_string(),
            entry: entry.clone(),
            error: error.to_string(),
          })
        })
        .collect(),
    }
  }
}

/// Execute the build command.
///
/// Loads `.dscli.json` from `project_root`, runs the build with the Go
/// toolchain from `$DSCLI_GO` (or `go`), and prints a summary.
///
/// # Errors
///
/// Returns an error if the run aborts (no manifest, bad target selector,
/// unusable output directory) or if no target produced an archive.
pub fn cmd_build(project_root: &Path, target: &str, output: OutputFormat) -> Result<()> {
  let options = BuildOptions {
    project_root: project_root.to_path_buf(),
    selector: target.to_string(),
  };
  let config = BuildConfig::load(project_root);
  let compiler = GoToolchain::from_env();
  debug!(
    root = %project_root.display(),
    selector = %target,
    output_dir = %config.output_dir,
    excludes = config.excludes.len(),
    compiler = ?compiler,
    "build configuration"
  );

  let started = Instant::now();
  let result = if output.is_json() {
    run_build(&options, &config, &compiler, &NoEvents)
  } else {
    run_build(&options, &config, &compiler, &ConsoleEvents)
  };
  let report = result.context("Build failed")?;
  info!(
    built = report.archives().count(),
    skipped = report.skipped().count(),
    elapsed_ms = started.elapsed().as_millis() as u64,
    "build finished"
  );

  if output.is_json() {
    print_json(&BuildOutput::from(&report))?;
  } else {
    print_summary(&report, started);
  }

  if !report.targets.is_empty() && report.archives().next().is_none() {
    bail!("No archives were produced");
  }

  Ok(())
}

fn print_summary(report: &BuildReport, started: Instant) {
  println!();
  print_heading(&format!("Build summary for {}", report.project_name));
  print_stat("Output", &report.output_dir.display().to_string());
  print_stat("Elapsed", &format_duration(started.elapsed()));
  print_stat(
    "Targets",
    &format_counts(report.archives().count(), report.skipped().count()),
  );

  for (target, archive) in report.archives() {
    print_archive_row(target, &archive.path, archive.size);
  }

  for (target, failure) in report.skipped() {
    print_skipped_row(target, failure);
  }

  for target_report in &report.targets {
    for (entry, error) in &target_report.compile_failures {
      print_compile_failure(target_report.target, entry, error);
    }
  }
}
