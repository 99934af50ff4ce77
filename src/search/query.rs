//! Query evaluation against a built [`Index`].

use crate::error::SearchError;
use ahash::{AHashMap, AHashSet};
use rapidfuzz::distance::jaro_winkler;
use serde::Serialize;

use super::index::{DocId, Index, PostingList};
use super::scoring::{Accumulator, Candidate, rank};
use super::snippet;

/// Minimum Jaro-Winkler similarity for a term to be offered as a suggestion.
const SUGGESTION_THRESHOLD: f64 = 0.8;

/// A ranked search hit, ready for a presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredResult {
    /// Id of the matched record (its position in the loaded record array)
    pub doc_id: u32,
    pub location: String,
    pub title: String,
    pub snippet: String,
    pub score: f32,
    /// Number of distinct query terms the record matched
    pub matched_terms: usize,
}

/// An indexed term similar to a query term that matched nothing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TermSuggestion {
    pub term: String,
    pub score: f64,
}

/// Normalized, de-duplicated query terms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryTerms {
    terms: Vec<String>,
    /// Whether the final term also matches longer indexed terms
    prefix_last: bool,
}

impl QueryTerms {
    /// Tokenizes `query` with the index's own tokenizer.
    pub fn parse(index: &Index, query: &str) -> Self {
        let mut seen = AHashSet::new();
        let terms = index
            .tokenizer()
            .tokenize(query)
            .into_iter()
            .filter(|term| seen.insert(term.clone()))
            .collect();

        Self {
            terms,
            prefix_last: index.config().prefix_last_term,
        }
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Whether an indexed term is matched by this query.
    pub fn matches(&self, indexed: &str) -> bool {
        self.terms
            .iter()
            .enumerate()
            .any(|(idx, term)| self.matches_at(idx, term, indexed))
    }

    fn matches_at(&self, idx: usize, term: &str, indexed: &str) -> bool {
        if self.prefix_last && idx + 1 == self.terms.len() {
            indexed.starts_with(term)
        } else {
            indexed == term
        }
    }

    /// Posting lists matched by query term `idx`.
    ///
    /// A prefix term skips indexed terms that an earlier exact term already
    /// credits, so no posting is scored twice.
    fn postings<'a>(&self, index: &'a Index, idx: usize) -> Vec<&'a PostingList> {
        let term = &self.terms[idx];
        if self.prefix_last && idx + 1 == self.terms.len() {
            let earlier = &self.terms[..idx];
            index
                .terms_with_prefix(term)
                .filter(|(indexed, _)| !earlier.iter().any(|exact| exact == indexed))
                .map(|(_, list)| list)
                .collect()
        } else {
            index.postings(term).into_iter().collect()
        }
    }
}

/// Searches `index` for `query`, returning at most `limit` ranked results.
///
/// Records matching any query term are candidates. An empty query (or one made
/// entirely of stop words) yields no results; so does a query that matches
/// nothing.
pub fn search(index: &Index, query: &str, limit: usize) -> Result<Vec<ScoredResult>, SearchError> {
    if limit == 0 {
        return Err(SearchError::InvalidLimit(limit));
    }

    let query_terms = QueryTerms::parse(index, query);
    if query_terms.is_empty() {
        tracing::debug!("Query {:?} has no searchable terms", query);
        return Ok(vec![]);
    }

    let config = index.config();
    let mut accumulators: AHashMap<DocId, Accumulator> = AHashMap::new();

    for idx in 0..query_terms.terms().len() {
        for list in query_terms.postings(index, idx) {
            for posting in list.postings() {
                accumulators
                    .entry(posting.doc)
                    .or_insert_with(|| Accumulator::new(idx))
                    .add(config, idx, posting);
            }
        }
    }

    let mut candidates: Vec<Candidate> = accumulators
        .into_iter()
        .filter_map(|(doc, acc)| {
            index.record(doc).map(|record| Candidate {
                doc,
                score: acc.score(config),
                matched_terms: acc.matched_terms,
                title_len: record.title.chars().count(),
            })
        })
        .collect();

    let total = candidates.len();
    candidates.sort_by(rank);
    candidates.truncate(limit);

    tracing::debug!(
        "Query {:?} ({} terms) matched {} records, returning {}",
        query,
        query_terms.terms().len(),
        total,
        candidates.len()
    );

    Ok(candidates
        .into_iter()
        .filter_map(|candidate| hydrate(index, &query_terms, &candidate))
        .collect())
}

/// Turns a ranked candidate into a presentable result.
fn hydrate(index: &Index, query_terms: &QueryTerms, candidate: &Candidate) -> Option<ScoredResult> {
    let record = index.record(candidate.doc)?;

    let source = if record.text.trim().is_empty() {
        &record.title
    } else {
        &record.text
    };
    let tokens = index.tokenizer().tokens(source);
    let snippet = snippet::extract(
        source,
        &tokens,
        |term| query_terms.matches(term),
        index.config().snippet_chars,
    );

    Some(ScoredResult {
        doc_id: record.id,
        location: record.location.clone().unwrap_or_default(),
        title: record.title.clone(),
        snippet,
        score: candidate.score,
        matched_terms: candidate.matched_terms,
    })
}

impl Index {
    /// Searches this index. See [`search`].
    pub fn search(&self, query: &str, limit: usize) -> Result<Vec<ScoredResult>, SearchError> {
        search(self, query, limit)
    }

    /// Suggests indexed terms close to each query term that has no postings.
    ///
    /// Returns at most `max` suggestions, best first.
    pub fn suggest(&self, query: &str, max: usize) -> Vec<TermSuggestion> {
        let query_terms = QueryTerms::parse(self, query);
        let mut suggestions: Vec<TermSuggestion> = query_terms
            .terms()
            .iter()
            .filter(|term| self.postings(term).is_none())
            .flat_map(|term| {
                self.terms().filter_map(move |candidate| {
                    let score = jaro_winkler::similarity(term.chars(), candidate.chars());
                    (score >= SUGGESTION_THRESHOLD).then(|| TermSuggestion {
                        term: candidate.to_string(),
                        score,
                    })
                })
            })
            .collect();

        suggestions.sort_by(|a, b| b.score.total_cmp(&a.score).then_with(|| a.term.cmp(&b.term)));
        let mut seen = AHashSet::new();
        suggestions.retain(|suggestion| seen.insert(suggestion.term.clone()));
        suggestions.truncate(max);
        suggestions
    }
}
