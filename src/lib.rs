pub mod cli;
pub mod config;
pub mod error;
pub mod record;
pub mod search;
pub mod state;
pub mod tracing;

pub use config::SearchConfig;
pub use error::{ConfigError, LoadError, SearchError};
pub use record::{Category, DocRecord, load_records, parse_payload};
pub use search::{BuildReport, Field, Index, IndexBuilder, ScoredResult, search};
pub use state::SearchState;
