//! Terminal output for dscli.
//!
//! Status lines go through the `print_*` helpers. Build summary rows are laid
//! out by plain `format_*` functions so the layout can be checked without a
//! terminal.

use std::fmt::Display;
use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use clap::ValueEnum;
use owo_colors::{OwoColorize, Stream};

/// Width of the target column in summary rows; fits `windows/arm64`.
const TARGET_COLUMN: usize = 16;

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
  #[default]
  Text,
  Json,
}

impl OutputFormat {
  pub fn is_json(self) -> bool {
    matches!(self, OutputFormat::Json)
  }
}

pub mod symbols {
  pub const SUCCESS: &str = "✓";
  pub const ERROR: &str = "✗";
  pub const WARNING: &str = "⚠";
  pub const INFO: &str = "•";
  pub const ARROW: &str = "→";
}

/// Archive sizes: bytes below 1 KB, one decimal above.
pub fn format_bytes(bytes: u64) -> String {
  const UNITS: [&str; 3] = ["KB", "MB", "GB"];

  if bytes < 1024 {
    return format!("{} B", bytes);
  }

  let mut value = bytes as f64 / 1024.0;
  let mut unit = 0;
  while value >= 1024.0 && unit < UNITS.len() - 1 {
    value /= 1024.0;
    unit += 1;
  }
  format!("{:.1} {}", value, UNITS[unit])
}

pub fn format_duration(duration: Duration) -> String {
  let secs = duration.as_secs();
  if secs >= 60 {
    format!("{}m {}s", secs / 60, secs % 60)
  } else if secs > 0 {
    format!("{:.1}s", duration.as_secs_f64())
  } else {
    format!("{}ms", duration.as_millis())
  }
}

pub fn format_counts(built: usize, skipped: usize) -> String {
  format!("{} built, {} skipped", built, skipped)
}

/// `<target> <detail>` with the target padded to a fixed column.
pub fn format_target_row(target: impl Display, detail: &str) -> String {
  format!("{:<width$} {}", target.to_string(), detail, width = TARGET_COLUMN)
}

/// `<archive file name> (<size>)`.
pub fn format_archive(path: &Path, size: u64) -> String {
  let name = path
    .file_name()
    .map(|n| n.to_string_lossy().into_owned())
    .unwrap_or_else(|| path.display().to_string());
  format!("{} ({})", name, format_bytes(size))
}

pub fn format_compile_failure(target: impl Display, entry: &str, error: impl Display) -> String {
  format!("{}/{}: {}", target, entry, error)
}

pub fn format_compiled_entry(entry: &str, binary: &str) -> String {
  format!("{} {} bin/{}", entry, symbols::ARROW, binary)
}

pub fn print_success(message: &str) {
  println!(
    "{} {}",
    symbols::SUCCESS.if_supports_color(Stream::Stdout, |s| s.green()),
    message
  );
}

pub fn print_error(message: &str) {
  eprintln!(
    "{} {}",
    symbols::ERROR.if_supports_color(Stream::Stderr, |s| s.red()),
    message.if_supports_color(Stream::Stderr, |s| s.red())
  );
}

pub fn print_warning(message: &str) {
  eprintln!(
    "{} {}",
    symbols::WARNING.if_supports_color(Stream::Stderr, |s| s.yellow()),
    message.if_supports_color(Stream::Stderr, |s| s.yellow())
  );
}

pub fn print_info(message: &str) {
  println!(
    "{} {}",
    symbols::INFO.if_supports_color(Stream::Stdout, |s| s.blue()),
    message
  );
}

pub fn print_stat(label: &str, value: &str) {
  println!(
    "  {}: {}",
    label.if_supports_color(Stream::Stdout, |s| s.dimmed()),
    value
  );
}

pub fn print_heading(title: &str) {
  println!("{}", title.if_supports_color(Stream::Stdout, |s| s.bold()));
}

/// Indented line for one entry point built during a target.
pub fn print_compiled_entry(entry: &str, binary: &str) {
  println!(
    "  {} {}",
    symbols::SUCCESS.if_supports_color(Stream::Stdout, |s| s.green()),
    format_compiled_entry(entry, binary)
  );
}

pub fn print_archive_row(target: impl Display, path: &Path, size: u64) {
  println!(
    "  {} {}",
    symbols::SUCCESS.if_supports_color(Stream::Stdout, |s| s.green()),
    format_target_row(target, &format_archive(path, size))
  );
}

pub fn print_skipped_row(target: impl Display, reason: impl Display) {
  println!(
    "  {} {}",
    symbols::ERROR.if_supports_color(Stream::Stdout, |s| s.red()),
    format_target_row(target, &reason.to_string())
  );
}

pub fn print_compile_failure(target: impl Display, entry: &str, error: impl Display) {
  println!(
    "  {} {}",
    symbols::WARNING.if_supports_color(Stream::Stdout, |s| s.yellow()),
    format_compile_failure(target, entry, error)
  );
}

/// "Next steps:" followed by one highlighted command or hint per line.
pub fn print_next_steps(steps: &[String]) {
  println!();
  print_heading("Next steps:");
  for step in steps {
    println!(
      "  {} {}",
      symbols::ARROW,
      step.if_supports_color(Stream::Stdout, |s| s.cyan())
    );
  }
}

pub fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
  let json = serde_json::to_string_pretty(value).context("Failed to serialize to JSON")?;
  println!("{}", json);
  Ok(())
}
