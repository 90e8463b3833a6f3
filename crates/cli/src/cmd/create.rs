//! Implementation of the `dscli create` command.
//!
//! Scaffolds a new dsserv module project, prompting for anything not given on
//! the command line unless `--non-interactive` is set.

use std::path::Path;

use anyhow::{Context, Result, bail};
use owo_colors::OwoColorize;
use tracing::info;

use dscli_lib::init::{DEFAULT_AUTHOR, DEFAULT_DESCRIPTION, DEFAULT_VERSION, ProjectInfo, create_project};

use crate::output::{print_info, print_next_steps, symbols};
use crate::prompts;

/// Values given on the command line.
#[derive(Debug, Default)]
pub struct CreateArgs {
  pub name: Option<String>,
  pub description: Option<String>,
  pub version: Option<String>,
  pub author: Option<String>,
  pub non_interactive: bool,
}

/// Execute the create command in `parent`.
///
/// # Errors
///
/// Returns an error if no name is available, if the project already exists,
/// or if prompting is impossible without `--non-interactive`.
pub fn cmd_create(parent: &Path, args: CreateArgs) -> Result<()> {
  let info = resolve_info(args)?;
  let result = create_project(parent, &info).context("Failed to create project")?;
  info!(
    name = %info.name,
    dir = %result.project_dir.display(),
    files = result.files.len(),
    "created project"
  );

  println!(
    "{} {}",
    symbols::SUCCESS.green(),
    format!("Project '{}' created!", info.name).green().bold()
  );
  println!();
  for file in &result.files {
    let relative = file.strip_prefix(parent).unwrap_or(file);
    print_info(&relative.display().to_string());
  }
  print_next_steps(&[
    format!("cd {}", info.name),
    "go mod tidy".to_string(),
    "dscli build".to_string(),
  ]);

  Ok(())
}

fn resolve_info(args: CreateArgs) -> Result<ProjectInfo> {
  if args.non_interactive {
    let Some(name) = args.name.filter(|n| !n.trim().is_empty()) else {
      bail!("A project name is required in non-interactive mode");
    };
    return Ok(ProjectInfo {
      name,
      description: or_default(args.description, DEFAULT_DESCRIPTION),
      version: or_default(args.version, DEFAULT_VERSION),
      author: or_default(args.author, DEFAULT_AUTHOR),
    });
  }

  let name = match args.name {
    Some(name) => name,
    None => prompts::input("Project name", "", true)?,
  };
  let description = match args.description {
    Some(description) => description,
    None => prompts::input("Description", DEFAULT_DESCRIPTION, true)?,
  };
  let version = match args.version {
    Some(version) => version,
    None => prompts::input("Version", DEFAULT_VERSION, true)?,
  };
  let author = match args.author {
    Some(author) => author,
    None => prompts::input("Author", DEFAULT_AUTHOR, false)?,
  };

  Ok(ProjectInfo {
    name,
    description,
    version,
    author,
  })
}

fn or_default(value: Option<String>, default: &str) -> String {
  value
    .filter(|v| !v.trim().is_empty())
    .unwrap_or_else(|| default.to_string())
}
