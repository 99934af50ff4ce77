//! Shared test fixtures and utilities for integration tests.
//!
//! # Available Fixtures
//!
//! - `example_records`: the two-record "Parallel Reduction" / "Parallel Loop" set
//! - `fixture_records`: records parsed from `tests/fixtures/search_index.js`
//! - `fixture_state`: a [`SearchState`] initialized with `fixture_records`
//!
//! [`TempPayload`] writes ad-hoc payloads to disk for loader tests.

use documenter_search::{DocRecord, SearchState, load_records};
use rstest::fixture;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Number of records in the fixture payload.
#[allow(dead_code)] // Used across different integration test crates
pub const FIXTURE_RECORDS: usize = 14;

/// Number of fixture records without a location.
#[allow(dead_code)]
pub const FIXTURE_SKIPPED: usize = 1;

/// Returns the path of the fixture payload.
pub fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/search_index.js")
}

/// The two-record example set used throughout the search tests.
#[fixture]
#[allow(dead_code)]
pub fn example_records() -> Vec<DocRecord> {
    vec![
        DocRecord::new(0, "/a", "Parallel Reduction", "floop reduce"),
        DocRecord::new(1, "/b", "Parallel Loop", "floop executor"),
    ]
}

/// Records parsed from the fixture payload.
#[fixture]
#[allow(dead_code)]
pub fn fixture_records() -> Vec<DocRecord> {
    documenter_search::tracing::init(documenter_search::tracing::LogFormat::Compact);
    load_records(&fixture_path()).expect("Failed to load fixture payload")
}

/// A search state loaded with the fixture payload.
#[fixture]
#[allow(dead_code)]
pub fn fixture_state(fixture_records: Vec<DocRecord>) -> SearchState {
    let state = SearchState::default();
    state.init(fixture_records);
    state
}

/// A payload file in a temporary directory, removed on drop.
#[allow(dead_code)] // Methods used across different integration test crates
pub struct TempPayload {
    _temp: TempDir,
    path: PathBuf,
}

#[allow(dead_code)]
impl TempPayload {
    /// Writes `contents` to `search_index.js` in a fresh temp directory.
    pub fn new(contents: &str) -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let path = temp.path().join("search_index.js");
        std::fs::write(&path, contents).expect("Failed to write payload");
        Self { _temp: temp, path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
