//! CLI integration tests.

mod add_tests;
mod build_tests;
mod common;
mod create_tests;
