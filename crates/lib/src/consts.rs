//! File and directory naming conventions shared across the crate.

/// Project manifest at the project root.
pub const MANIFEST_FILE: &str = "manifest.json";

/// Optional per-project packaging configuration.
pub const CONFIG_FILE: &str = ".dscli.json";

/// Compiler output staging directory, also the archive's binary directory.
pub const BIN_DIR: &str = "bin";

/// Directory whose immediate children are additional entry points.
pub const CMD_DIR: &str = "cmd";

/// Source file marking a directory as an entry point.
pub const ENTRY_SOURCE: &str = "main.go";

/// Output directory used when the configuration does not name one.
pub const DEFAULT_OUTPUT_DIR: &str = "dist";

/// Current manifest schema version written by `create`.
pub const MANIFEST_SCHEMA_VERSION: u32 = 1;

/// Environment variable overriding the compiler program.
pub const COMPILER_ENV_VAR: &str = "DSCLI_GO";

/// Compiler program used when [`COMPILER_ENV_VAR`] is unset.
pub const DEFAULT_COMPILER: &str = "go";

/// Linker symbol receiving the build timestamp.
pub const BUILD_DATE_SYMBOL: &str = "main.buildDate";
