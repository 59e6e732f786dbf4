//! Shared test utilities for truenorthwatch integration tests.
//!
//! This module provides:
//! - `TestHarness` wiring a pipeline to an in-memory database
//! - Counting and scripted collaborators for the fetcher and scorer seams

#![allow(dead_code)]

pub mod harness;
pub mod mocks;

pub use harness::TestHarness;
pub use mocks::*;

/// Reads a platform text fixture from `tests/fixtures/platforms/`.
pub fn platform_fixture(name: &str) -> String {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("platforms")
        .join(name);
    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", path.display(), e))
}
