use std::fmt;
use std::str::FromStr;

/// Operating systems a module can be compiled for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Os {
  Windows,
  Darwin,
  Linux,
}

impl Os {
  /// Detect the host operating system.
  ///
  /// Returns `None` if the host OS is outside the supported set.
  pub fn current() -> Option<Self> {
    match std::env::consts::OS {
      "linux" => Some(Self::Linux),
      "macos" => Some(Self::Darwin),
      "windows" => Some(Self::Windows),
      _ => None,
    }
  }

  /// Returns the identifier the compiler toolchain uses for this OS.
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Windows => "windows",
      Self::Darwin => "darwin",
      Self::Linux => "linux",
    }
  }

  /// Suffix appended to executables built for this OS.
  pub fn exe_suffix(&self) -> &'static str {
    match self {
      Self::Windows => ".exe",
      Self::Darwin | Self::Linux => "",
    }
  }
}

impl fmt::Display for Os {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

impl FromStr for Os {
  type Err = ();

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "windows" => Ok(Self::Windows),
      "darwin" => Ok(Self::Darwin),
      "linux" => Ok(Self::Linux),
      _ => Err(()),
    }
  }
}
