//! Compiler driver.
//!
//! Compiles one entry point for one target through a [`Compiler`]. The
//! default implementation, [`GoToolchain`], spawns `go build` with the target
//! bound into its environment, cgo disabled, and the build timestamp embedded
//! through a linker string substitution.

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

use thiserror::Error;
use tracing::{debug, info};

use crate::consts::{BUILD_DATE_SYMBOL, COMPILER_ENV_VAR, DEFAULT_COMPILER};
use crate::discover::EntryPoint;
use crate::platform::Target;

/// Failure compiling a single entry point for a single target.
#[derive(Debug, Error)]
pub enum CompileError {
  #[error("failed to run compiler '{program}': {source}")]
  Spawn { program: String, source: io::Error },

  #[error("compiler exited with code {code:?} for {entry}: {stderr}")]
  Failed {
    entry: String,
    code: Option<i32>,
    stderr: String,
  },

  #[error("compiler reported success but produced no binary at {}", path.display())]
  MissingOutput { path: PathBuf },
}

/// Everything a compiler needs for one invocation.
#[derive(Debug, Clone)]
pub struct CompileRequest<'a> {
  /// Working directory for the compiler.
  pub project_root: &'a Path,
  pub entry: &'a EntryPoint,
  pub target: Target,
  /// RFC 3339 timestamp embedded into the binary.
  pub build_date: &'a str,
  /// Where the binary must be written.
  pub output: PathBuf,
}

impl CompileRequest<'_> {
  /// Environment variables added on top of the inherited environment.
  pub fn env(&self) -> BTreeMap<&'static str, String> {
    BTreeMap::from([
      ("GOOS", self.target.os.to_string()),
      ("GOARCH", self.target.arch.to_string()),
      ("CGO_ENABLED", "0".to_string()),
    ])
  }

  /// Linker flag embedding the build timestamp.
  pub fn ldflags(&self) -> String {
    format!("-ldflags=-X {}={}", BUILD_DATE_SYMBOL, self.build_date)
  }
}

/// Something that turns a [`CompileRequest`] into a binary at `request.output`.
pub trait Compiler {
  fn invoke(&self, request: &CompileRequest<'_>) -> Result<(), CompileError>;
}

impl<F> Compiler for F
where
  F: Fn(&CompileRequest<'_>) -> Result<(), CompileError>,
{
  fn invoke(&self, request: &CompileRequest<'_>) -> Result<(), CompileError> {
    self(request)
  }
}

/// The Go toolchain, invoked as a blocking subprocess.
#[derive(Debug, Clone)]
pub struct GoToolchain {
  program: String,
}

impl GoToolchain {
  pub fn new(program: impl Into<String>) -> Self {
    Self { program: program.into() }
  }

  /// Use `$DSCLI_GO` if set, otherwise `go` from `PATH`.
  pub fn from_env() -> Self {
    let program = std::env::var(COMPILER_ENV_VAR)
      .ok()
      .filter(|p| !p.trim().is_empty())
      .unwrap_or_else(|| DEFAULT_COMPILER.to_string());
    Self::new(program)
  }

  pub fn program(&self) -> &str {
    &self.program
  }
}

impl Default for GoToolchain {
  fn default() -> Self {
    Self::from_env()
  }
}

impl Compiler for GoToolchain {
  fn invoke(&self, request: &CompileRequest<'_>) -> Result<(), CompileError> {
    let mut command = Command::new(&self.program);
    command
      .arg("build")
      .arg(request.ldflags())
      .arg("-o")
      .arg(&request.output)
      .arg(&request.entry.source)
      .current_dir(request.project_root)
      .envs(request.env());

    debug!(program = %self.program, command = ?command, "spawning compiler");

    let output = command.output().map_err(|e| CompileError::Spawn {
      program: self.program.clone(),
      source: e,
    })?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    if !stdout.trim().is_empty() {
      debug!(stdout = %stdout.trim(), "compiler stdout");
    }

    if !output.status.success() {
      return Err(CompileError::Failed {
        entry: request.entry.name.clone(),
        code: output.status.code(),
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
      });
    }

    Ok(())
  }
}

/// File name of the binary for `entry` on `target`.
pub fn binary_name(entry: &EntryPoint, target: Target) -> String {
  format!("{}{}", entry.name, target.os.exe_suffix())
}

/// A binary produced in the staging directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledBinary {
  /// File name inside the binary directory, e.g. `svc.exe`.
  pub name: String,
  pub path: PathBuf,
}

/// Compile `entry` for `target` into `bin_dir`.
pub fn compile_entry(
  compiler: &dyn Compiler,
  project_root: &Path,
  bin_dir: &Path,
  entry: &EntryPoint,
  target: Target,
  build_date: &str,
) -> Result<CompiledBinary, CompileError> {
  let name = binary_name(entry, target);
  let output = bin_dir.join(&name);

  info!(entry = %entry.name, target = %target, "compiling");

  let request = CompileRequest {
    project_root,
    entry,
    target,
    build_date,
    output: output.clone(),
  };
  compiler.invoke(&request)?;

  if !output.is_file() {
    return Err(CompileError::MissingOutput { path: output });
  }

  Ok(CompiledBinary { name, path: output })
}
