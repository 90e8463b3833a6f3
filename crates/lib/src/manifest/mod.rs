//! The project manifest (`manifest.json`).
//!
//! The manifest records project identity and the state of the most recent
//! build: target OS/architecture, build timestamp, and the executables the
//! build produced.

mod store;
mod types;

pub use store::*;
pub use types::*;
