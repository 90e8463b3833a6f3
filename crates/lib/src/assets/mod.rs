//! Asset declarations and exclusion rules.
//!
//! An asset declaration is either a bare path (`"config/"`) or an explicit
//! `{ "source": ..., "output": ... }` pair. Both normalize to [`Asset`].
//! Exclusion patterns are shell globs checked against the full path, by exact
//! string, and against the base name; any match excludes the path.

use glob::{MatchOptions, Pattern};
use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

/// Errors from decoding asset declarations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AssetError {
  #[error("invalid asset declaration: assets must be an array")]
  NotAnArray,

  #[error("invalid asset declaration at index {index}: expected a path string or an object with source and output")]
  InvalidAssetSpec { index: usize },
}

/// One asset declaration as written in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum AssetSpec {
  /// Copied to the same path inside the archive.
  Plain(String),
  /// Copied from `source` to `output` inside the archive.
  Mapped { source: String, output: String },
}

/// A normalized asset: where to read it and where it lands in the archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
  pub source: String,
  pub output: String,
}

impl From<AssetSpec> for Asset {
  fn from(spec: AssetSpec) -> Self {
    match spec {
      AssetSpec::Plain(path) => Self {
        source: path.clone(),
        output: path,
      },
      AssetSpec::Mapped { source, output } => Self { source, output },
    }
  }
}

/// Decode the raw `assets` value into normalized assets.
///
/// `null` means no assets. Any element that is neither a string nor a
/// complete source/output pair rejects the whole declaration.
pub fn resolve_assets(declaration: &serde_json::Value) -> Result<Vec<Asset>, AssetError> {
  let items = match declaration {
    serde_json::Value::Null => return Ok(Vec::new()),
    serde_json::Value::Array(items) => items,
    _ => return Err(AssetError::NotAnArray),
  };

  items
    .iter()
    .enumerate()
    .map(|(index, item)| {
      AssetSpec::deserialize(item)
        .map(Asset::from)
        .map_err(|_| AssetError::InvalidAssetSpec { index })
    })
    .collect()
}

const MATCH_OPTIONS: MatchOptions = MatchOptions {
  case_sensitive: true,
  require_literal_separator: true,
  require_literal_leading_dot: false,
};

#[derive(Debug, Clone)]
struct ExcludeRule {
  literal: String,
  pattern: Option<Pattern>,
}

/// Compiled exclusion patterns.
#[derive(Debug, Clone, Default)]
pub struct ExcludeSet {
  rules: Vec<ExcludeRule>,
}

impl ExcludeSet {
  /// Compile `patterns`. A pattern that is not a valid glob only takes part
  /// in exact-string matching.
  pub fn new<S: AsRef<str>>(patterns: &[S]) -> Self {
    let rules = patterns
      .iter()
      .map(|raw| {
        let literal = raw.as_ref().trim_end_matches('/').to_string();
        let pattern = match Pattern::new(&literal) {
          Ok(pattern) => Some(pattern),
          Err(e) => {
            warn!(pattern = %raw.as_ref(), error = %e, "invalid exclude pattern, using exact match only");
            None
          }
        };
        ExcludeRule { literal, pattern }
      })
      .collect();
    Self { rules }
  }

  pub fn is_empty(&self) -> bool {
    self.rules.is_empty()
  }

  /// Whether `path` matches any rule by full-path glob, exact string, or base-name glob.
  pub fn is_excluded(&self, path: &str) -> bool {
    let normalized = path.replace('\\', "/");
    let candidate = normalized.trim_end_matches('/');
    let base_name = candidate.rsplit('/').next().unwrap_or(candidate);

    self.rules.iter().any(|rule| {
      let glob_match = |text: &str| {
        rule
          .pattern
          .as_ref()
          .is_some_and(|pattern| pattern.matches_with(text, MATCH_OPTIONS))
      };
      glob_match(candidate) || rule.literal == candidate || glob_match(base_name)
    })
  }
}
