mod cmd;
mod output;
mod prompts;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::cmd::{CreateArgs, cmd_add, cmd_build, cmd_create, cmd_version};
use crate::output::OutputFormat;

/// dscli - build and package dsserv modules
#[derive(Parser)]
#[command(name = "dscli")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable verbose output
  #[arg(short, long, global = true)]
  verbose: bool,

  /// Run as if started in this directory
  #[arg(short = 'C', long = "dir", global = true, value_name = "PATH")]
  dir: Option<PathBuf>,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Cross-compile every entry point and package one archive per target
  Build {
    /// Target platform as os/arch, or "all" (default: host platform)
    #[arg(short, long, default_value = "")]
    target: String,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    output: OutputFormat,
  },

  /// Add an entry point under cmd/ and register its executable
  Add {
    /// Name of the new executable
    name: String,
  },

  /// Create a new dsserv module project
  Create {
    /// Project name (prompted for when omitted)
    name: Option<String>,

    /// Project description
    #[arg(short, long)]
    description: Option<String>,

    /// Project version
    #[arg(long = "project-version", value_name = "VERSION")]
    project_version: Option<String>,

    /// Project author
    #[arg(short, long)]
    author: Option<String>,

    /// Use defaults instead of prompting
    #[arg(long)]
    non_interactive: bool,
  },

  /// Show tool version and host platform
  Version {
    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    output: OutputFormat,
  },
}

fn main() -> Result<()> {
  let cli = Cli::parse();

  let filter = if cli.verbose {
    EnvFilter::new("debug")
  } else {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
  };
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  run(cli)
}

fn run(cli: Cli) -> Result<()> {
  let dir = working_dir(cli.dir)?;

  match cli.command {
    Commands::Build { target, output } => cmd_build(&dir, &target, output),
    Commands::Add { name } => cmd_add(&dir, &name),
    Commands::Create {
      name,
      description,
      project_version,
      author,
      non_interactive,
    } => cmd_create(
      &dir,
      CreateArgs {
        name,
        description,
        version: project_version,
        author,
        non_interactive,
      },
    ),
    Commands::Version { output } => cmd_version(output),
  }
}

fn working_dir(dir: Option<PathBuf>) -> Result<PathBuf> {
  let dir = match dir {
    Some(dir) => dir,
    None => std::env::current_dir().context("Failed to determine current directory")?,
  };
  dunce::canonicalize(&dir).with_context(|| format!("Directory not found: {}", dir.display()))
}
