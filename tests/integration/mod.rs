//! Integration test suite for yamladapt
//!
//! End-to-end tests of the adapt pipeline through the library API and the
//! `yamladapt` binary.
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **adapt**: fixture documents adapted through the library
//! - **includes**: include graphs built in temporary directories
//! - **cli**: the `yamladapt` binary and its subcommands

use std::path::PathBuf;

mod adapt;
mod cli;
mod includes;

/// Path of a file under `tests/fixtures`.
pub fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name)
}

/// Parse the expected JSON stored next to a fixture.
pub fn expected_json(name: &str) -> serde_json::Value {
    let text = std::fs::read_to_string(fixture(name)).unwrap();
    serde_json::from_str(&text).unwrap()
}
