//! Load-once, query-many search state with an explicit lifecycle.

use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::record::DocRecord;
use crate::search::{BuildReport, Index, ScoredResult};
use std::sync::{Arc, PoisonError, RwLock};

/// Holds the currently loaded index for a search front end.
///
/// Replaces an ambient global: callers own a `SearchState` (usually one per
/// process or page) and drive it through [`SearchState::init`] and
/// [`SearchState::teardown`]. Queries take a snapshot of the index, so an
/// `init` racing with in-flight searches never blocks them or mixes indices.
#[derive(Debug, Default)]
pub struct SearchState {
    config: SearchConfig,
    index: RwLock<Option<Arc<Index>>>,
}

impl SearchState {
    /// Create an uninitialized state that will build indices with `config`.
    pub fn new(config: SearchConfig) -> Self {
        Self {
            config,
            index: RwLock::new(None),
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Builds an index over `records` and makes it current.
    ///
    /// Any previously loaded index is replaced. The build runs before the
    /// write lock is taken.
    pub fn init(&self, records: impl IntoIterator<Item = DocRecord>) -> BuildReport {
        let (index, report) = Index::build_with(records, self.config.clone());
        let previous = self
            .index
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(Arc::new(index));

        if previous.is_some() {
            tracing::debug!("Replaced previously loaded search index");
        }
        if report.skipped > 0 {
            tracing::warn!(
                "Skipped {} malformed records ({} indexed)",
                report.skipped,
                report.indexed
            );
        }

        report
    }

    /// Drops the current index. Returns whether one was loaded.
    ///
    /// Searches already holding a snapshot finish against it.
    pub fn teardown(&self) -> bool {
        let previous = self
            .index
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        tracing::debug!("Search index torn down (was loaded: {})", previous.is_some());
        previous.is_some()
    }

    pub fn is_initialized(&self) -> bool {
        self.index
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Snapshot of the current index.
    pub fn index(&self) -> Result<Arc<Index>, SearchError> {
        self.index
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .ok_or(SearchError::NotInitialized)
    }

    /// Searches the current index. See [`crate::search::search`].
    pub fn search(&self, query: &str, limit: usize) -> Result<Vec<ScoredResult>, SearchError> {
        self.index()?.search(query, limit)
    }
}
