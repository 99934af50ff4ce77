//! Full-text search over documentation records.
//!
//! This module provides tokenization, inverted indexing, field-weighted
//! scoring, and ranked query evaluation with snippets.

// Module declarations
pub(crate) mod index;
pub(crate) mod query;
pub(crate) mod scoring;
pub(crate) mod snippet;
pub(crate) mod tokenize;

// Public re-exports (used via lib.rs)
pub use index::{BuildReport, DocId, Field, Index, IndexBuilder, Posting, PostingList};
pub use query::{QueryTerms, ScoredResult, TermSuggestion, search};
pub use tokenize::{Token, Tokenizer};
