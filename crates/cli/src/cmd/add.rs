//! Implementation of the `dscli add` command.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use dscli_lib::init::add_entry_point;
use dscli_lib::manifest::RegisterOutcome;

use crate::output::{print_info, print_next_steps, print_success};

/// Execute the add command.
///
/// Creates `cmd/<name>/main.go` (kept if it already exists) and registers
/// `./bin/<name>` in the manifest.
pub fn cmd_add(project_root: &Path, name: &str) -> Result<()> {
  let result = add_entry_point(project_root, name).with_context(|| format!("Failed to add executable '{}'", name))?;

  let relative = result
    .source_path
    .strip_prefix(project_root)
    .unwrap_or(&result.source_path)
    .display()
    .to_string();
  info!(name = %name, source = %relative, created = result.created, "added entry point");

  if result.created {
    print_info(&format!("Created {}", relative));
  } else {
    print_info(&format!("Source file already exists: {}", relative));
  }

  match &result.outcome {
    RegisterOutcome::Added(path) => print_info(&format!("Registered {} in manifest.json", path)),
    RegisterOutcome::AlreadyPresent(path) => print_info(&format!("{} is already listed in manifest.json", path)),
  }

  println!();
  print_success(&format!("Executable '{}' added", name));
  print_next_steps(&[format!("edit {}", relative), "dscli build".to_string()]);

  Ok(())
}
