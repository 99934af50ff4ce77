//! Inverted index over documentation records.

use crate::config::SearchConfig;
use crate::record::DocRecord;
use ahash::AHashMap;
use serde::Serialize;
use std::sync::Arc;

use super::tokenize::Tokenizer;

/// Position of a record inside an [`Index`]. Assigned in insertion order.
pub type DocId = u32;

/// Record field a term occurrence came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Title,
    Text,
}

/// Occurrences of one term in one field of one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Posting {
    pub doc: DocId,
    pub frequency: u32,
    pub field: Field,
}

/// Postings of a single term, ordered by `(doc, field)`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostingList {
    postings: Vec<Posting>,
}

impl PostingList {
    pub fn postings(&self) -> &[Posting] {
        &self.postings
    }

    /// Number of distinct records containing the term.
    pub fn document_frequency(&self) -> usize {
        let mut count = 0;
        let mut last = None;
        for posting in &self.postings {
            if last != Some(posting.doc) {
                count += 1;
                last = Some(posting.doc);
            }
        }
        count
    }

    fn push(&mut self, posting: Posting) {
        debug_assert!(
            self.postings
                .last()
                .is_none_or(|last| (last.doc, last.field) < (posting.doc, posting.field)),
            "postings must be appended in (doc, field) order"
        );
        self.postings.push(posting);
    }
}

/// Outcome of building an index from a record batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BuildReport {
    /// Records that were accepted into the index
    pub indexed: usize,
    /// Malformed records that were dropped
    pub skipped: usize,
}

/// A read-only searchable index.
///
/// Owns its posting lists exclusively. Records are reference counted so result
/// consumers can hold on to them independently of the index.
pub struct Index {
    /// Map from normalized term to its postings
    terms: AHashMap<String, PostingList>,
    /// All terms in lexicographic order, for prefix lookup
    sorted_terms: Vec<String>,
    /// Accepted records, indexed by [`DocId`]
    records: Vec<Arc<DocRecord>>,
    tokenizer: Tokenizer,
    config: SearchConfig,
}

impl std::fmt::Debug for Index {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Index")
            .field("term_count", &self.term_count())
            .field("document_count", &self.document_count())
            .field("tokenizer", &self.tokenizer)
            .finish_non_exhaustive()
    }
}

impl Index {
    /// Builds an index with the default configuration.
    pub fn build(records: impl IntoIterator<Item = DocRecord>) -> (Self, BuildReport) {
        Self::build_with(records, SearchConfig::default())
    }

    /// Builds an index with the given configuration.
    pub fn build_with(
        records: impl IntoIterator<Item = DocRecord>,
        config: SearchConfig,
    ) -> (Self, BuildReport) {
        let mut builder = IndexBuilder::new(config);
        for record in records {
            builder.add(record);
        }
        builder.finalize()
    }

    /// Postings of an exact (already normalized) term.
    pub fn postings(&self, term: &str) -> Option<&PostingList> {
        self.terms.get(term)
    }

    /// All indexed terms starting with `prefix`, in lexicographic order.
    pub fn terms_with_prefix<'a>(
        &'a self,
        prefix: &str,
    ) -> impl Iterator<Item = (&'a str, &'a PostingList)> {
        let start = self
            .sorted_terms
            .partition_point(|term| term.as_str() < prefix);
        self.sorted_terms[start..]
            .iter()
            .take_while(move |term| term.starts_with(prefix))
            .filter_map(move |term| self.terms.get(term).map(|list| (term.as_str(), list)))
    }

    /// All indexed terms in lexicographic order.
    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.sorted_terms.iter().map(String::as_str)
    }

    /// The `n` terms found in the most records, most frequent first.
    pub fn top_terms(&self, n: usize) -> Vec<(&str, usize)> {
        let mut counts: Vec<_> = self
            .sorted_terms
            .iter()
            .filter_map(|term| {
                self.terms
                    .get(term)
                    .map(|list| (term.as_str(), list.document_frequency()))
            })
            .collect();
        // Stable sort keeps lexicographic order among equal counts
        counts.sort_by(|(_, a), (_, b)| b.cmp(a));
        counts.truncate(n);
        counts
    }

    pub fn record(&self, doc: DocId) -> Option<&Arc<DocRecord>> {
        self.records.get(doc as usize)
    }

    pub fn records(&self) -> &[Arc<DocRecord>] {
        &self.records
    }

    pub fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Get the number of unique terms in the index
    pub fn term_count(&self) -> usize {
        self.terms.len()
    }

    /// Get the number of documents in the index
    pub fn document_count(&self) -> usize {
        self.records.len()
    }
}

/// Accumulates postings record by record, then produces an [`Index`].
#[derive(Debug)]
pub struct IndexBuilder {
    terms: AHashMap<String, PostingList>,
    records: Vec<Arc<DocRecord>>,
    skipped: usize,
    tokenizer: Tokenizer,
    config: SearchConfig,
}

impl Default for IndexBuilder {
    fn default() -> Self {
        Self::new(SearchConfig::default())
    }
}

impl IndexBuilder {
    pub fn new(config: SearchConfig) -> Self {
        Self {
            terms: AHashMap::default(),
            records: Vec::new(),
            skipped: 0,
            tokenizer: Tokenizer::new(&config),
            config,
        }
    }

    /// Indexes one record. Returns `false` if the record was malformed and skipped.
    pub fn add(&mut self, record: DocRecord) -> bool {
        if let Some(reason) = record.defect() {
            tracing::debug!(
                "Skipping record {} ({:?}): {}",
                record.id,
                record.location,
                reason
            );
            self.skipped += 1;
            return false;
        }

        let Ok(doc) = DocId::try_from(self.records.len()) else {
            tracing::warn!("Index is full, skipping record {}", record.id);
            self.skipped += 1;
            return false;
        };

        // Title before text keeps every posting list in (doc, field) order
        self.add_terms(&record.title, doc, Field::Title);
        self.add_terms(&record.text, doc, Field::Text);
        self.records.push(Arc::new(record));
        true
    }

    /// Counts term frequencies in one field and appends a posting per distinct term.
    fn add_terms(&mut self, text: &str, doc: DocId, field: Field) {
        let words = self.tokenizer.tokenize(text);

        let mut word_counts: AHashMap<String, u32> = AHashMap::with_capacity(words.len());
        for word in words {
            *word_counts.entry(word).or_insert(0) += 1;
        }

        for (word, frequency) in word_counts {
            self.terms.entry(word).or_default().push(Posting {
                doc,
                frequency,
                field,
            });
        }
    }

    /// Freezes the accumulated postings into a searchable index.
    pub fn finalize(self) -> (Index, BuildReport) {
        let start = std::time::Instant::now();

        let mut sorted_terms: Vec<String> = self.terms.keys().cloned().collect();
        sorted_terms.sort_unstable();

        let report = BuildReport {
            indexed: self.records.len(),
            skipped: self.skipped,
        };

        let index = Index {
            terms: self.terms,
            sorted_terms,
            records: self.records,
            tokenizer: self.tokenizer,
            config: self.config,
        };

        tracing::info!(
            "Built search index: {} unique terms, {} documents, {} skipped in {:?}",
            index.term_count(),
            report.indexed,
            report.skipped,
            start.elapsed()
        );

        (index, report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::{check, let_assert};

    fn records() -> Vec<DocRecord> {
        vec![
            DocRecord::new(0, "/a", "Parallel Reduction", "floop reduce reduce"),
            DocRecord::new(1, "/b", "Parallel Loop", "floop executor"),
        ]
    }

    #[test]
    fn test_postings_track_field_and_frequency() {
        let (index, report) = Index::build(records());
        check!(report == BuildReport { indexed: 2, skipped: 0 });

        let_assert!(Some(reduce) = index.postings("reduce"));
        let expected = [Posting {
            doc: 0,
            frequency: 2,
            field: Field::Text,
        }];
        check!(reduce.postings() == expected);

        let_assert!(Some(parallel) = index.postings("parallel"));
        check!(parallel.document_frequency() == 2);
        check!(parallel.postings().iter().all(|p| p.field == Field::Title));
    }

    #[test]
    fn test_same_term_in_both_fields() {
        let (index, _) = Index::build([DocRecord::new(0, "/c", "Loop", "a loop over loop bodies")]);
        let_assert!(Some(list) = index.postings("loop"));
        check!(list.postings().len() == 2);
        check!(list.postings()[0].field == Field::Title);
        check!(list.postings()[0].frequency == 1);
        check!(list.postings()[1].field == Field::Text);
        check!(list.postings()[1].frequency == 2);
        check!(list.document_frequency() == 1);
    }

    #[test]
    fn test_malformed_records_skipped_not_fatal() {
        let mut input = records();
        input.insert(
            1,
            DocRecord {
                location: None,
                ..DocRecord::new(7, "", "No location", "text")
            },
        );
        input.push(DocRecord::new(8, "/empty", "", ""));

        let (index, report) = Index::build(input);
        check!(report == BuildReport { indexed: 2, skipped: 2 });
        check!(index.document_count() == 2);
        // DocIds are dense over accepted records only
        check!(index.record(1).map(|r| r.id) == Some(1));
        check!(index.postings("location").is_none());
    }

    #[test]
    fn test_every_posting_refers_to_a_record() {
        let (index, _) = Index::build(records());
        for term in index.terms() {
            let_assert!(Some(list) = index.postings(term));
            for posting in list.postings() {
                check!(index.record(posting.doc).is_some());
            }
        }
    }

    #[test]
    fn test_terms_with_prefix() {
        let (index, _) = Index::build(records());
        let terms: Vec<&str> = index.terms_with_prefix("re").map(|(t, _)| t).collect();
        check!(terms == vec!["reduce", "reduction"]);
        check!(index.terms_with_prefix("zzz").next().is_none());
    }

    #[test]
    fn test_top_terms() {
        let (index, _) = Index::build(records());
        let top = index.top_terms(2);
        check!(top == vec![("floop", 2), ("parallel", 2)]);
    }

    #[test]
    fn test_empty_input() {
        let (index, report) = Index::build(Vec::new());
        check!(report == BuildReport::default());
        check!(index.term_count() == 0);
        check!(index.document_count() == 0);
    }

    #[test]
    fn test_index_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Index>();
    }
}
