use std::fmt;
use std::str::FromStr;

/// CPU architectures a module can be compiled for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Arch {
  I386,
  Amd64,
  Arm64,
}

impl Arch {
  /// Detect the host CPU architecture.
  ///
  /// Returns `None` if the host architecture is outside the supported set.
  pub fn current() -> Option<Self> {
    match std::env::consts::ARCH {
      "x86" => Some(Self::I386),
      "x86_64" => Some(Self::Amd64),
      "aarch64" => Some(Self::Arm64),
      _ => None,
    }
  }

  /// Returns the identifier the compiler toolchain uses for this architecture.
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::I386 => "386",
      Self::Amd64 => "amd64",
      Self::Arm64 => "arm64",
    }
  }
}

impl fmt::Display for Arch {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

impl FromStr for Arch {
  type Err = ();

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "386" => Ok(Self::I386),
      "amd64" => Ok(Self::Amd64),
      "arm64" => Ok(Self::Arm64),
      _ => Err(()),
    }
  }
}
