//! Build targets and target-selector resolution.
//!
//! A [`Target`] is an (OS, architecture) pair drawn from [`SUPPORTED_TARGETS`].
//! Pairs outside that matrix are rejected before any compilation starts.

pub mod arch;
pub mod os;

use std::fmt;

use thiserror::Error;

pub use arch::Arch;
pub use os::Os;

/// Selector value that expands to the whole matrix.
pub const ALL_SELECTOR: &str = "all";

/// An (operating system, architecture) pair the pipeline can compile for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Target {
  pub os: Os,
  pub arch: Arch,
}

/// Every supported target, in the order `"all"` builds them.
pub const SUPPORTED_TARGETS: &[Target] = &[
  Target::new(Os::Windows, Arch::I386),
  Target::new(Os::Windows, Arch::Amd64),
  Target::new(Os::Windows, Arch::Arm64),
  Target::new(Os::Darwin, Arch::Amd64),
  Target::new(Os::Darwin, Arch::Arm64),
  Target::new(Os::Linux, Arch::I386),
  Target::new(Os::Linux, Arch::Amd64),
  Target::new(Os::Linux, Arch::Arm64),
];

/// Errors from turning a selector into targets.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TargetError {
  #[error("invalid target selector '{0}', expected os/arch or 'all'")]
  InvalidSelector(String),

  #[error("unsupported target platform: {os}/{arch}")]
  UnsupportedTarget { os: String, arch: String },
}

impl Target {
  pub const fn new(os: Os, arch: Arch) -> Self {
    Self { os, arch }
  }

  /// The host's own target.
  ///
  /// Fails if the host OS or architecture is not part of the matrix.
  pub fn host() -> Result<Self, TargetError> {
    match (Os::current(), Arch::current()) {
      (Some(os), Some(arch)) => Self::new(os, arch).validated(),
      _ => Err(TargetError::UnsupportedTarget {
        os: std::env::consts::OS.to_string(),
        arch: std::env::consts::ARCH.to_string(),
      }),
    }
  }

  /// Whether this pair is part of [`SUPPORTED_TARGETS`].
  pub fn is_supported(&self) -> bool {
    SUPPORTED_TARGETS.contains(self)
  }

  fn validated(self) -> Result<Self, TargetError> {
    if self.is_supported() {
      Ok(self)
    } else {
      Err(TargetError::UnsupportedTarget {
        os: self.os.to_string(),
        arch: self.arch.to_string(),
      })
    }
  }
}

impl fmt::Display for Target {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}/{}", self.os, self.arch)
  }
}

/// Resolve a user-supplied selector into concrete targets.
///
/// - `""` resolves to the host target
/// - `"all"` resolves to [`SUPPORTED_TARGETS`] in order
/// - `"<os>/<arch>"` resolves to that single target if it is supported
pub fn resolve_targets(selector: &str) -> Result<Vec<Target>, TargetError> {
  let selector = selector.trim();

  if selector.is_empty() {
    return Ok(vec![Target::host()?]);
  }

  if selector == ALL_SELECTOR {
    return Ok(SUPPORTED_TARGETS.to_vec());
  }

  let parts: Vec<&str> = selector.split('/').collect();
  let [os, arch] = parts.as_slice() else {
    return Err(TargetError::InvalidSelector(selector.to_string()));
  };

  let unsupported = || TargetError::UnsupportedTarget {
    os: os.to_string(),
    arch: arch.to_string(),
  };
  let os: Os = os.parse().map_err(|_| unsupported())?;
  let arch: Arch = arch.parse().map_err(|_| unsupported())?;

  Ok(vec![Target::new(os, arch).validated()?])
}
