//! dscli-lib: build-and-package pipeline for dsserv modules.
//!
//! This crate provides the pieces the `dscli` command line drives:
//! - `platform`: the supported OS/architecture matrix and selector resolution
//! - `manifest`: the persisted `manifest.json` project record
//! - `config`: the optional `.dscli.json` packaging policy
//! - `assets`: asset declarations and exclusion patterns
//! - `discover`: entry-point discovery under the project root and `cmd/`
//! - `compile`: cross-compiling one entry point for one target
//! - `archive`: packaging binaries, manifest, and assets into a `.tar.gz`
//! - `build`: the per-target orchestration loop
//! - `init`: project and entry-point scaffolding

pub mod archive;
pub mod assets;
pub mod build;
pub mod compile;
pub mod config;
pub mod consts;
pub mod discover;
pub mod init;
pub mod manifest;
pub mod platform;
