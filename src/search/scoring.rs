//! Relevance scoring and result ordering.
//!
//! A document's raw score is the field-weighted sum of term frequencies over
//! every matched query term. The raw score is then scaled by a coordination
//! factor so that documents matching more distinct query terms rank higher.

use crate::config::SearchConfig;
use std::cmp::Ordering;

use super::index::{DocId, Field, Posting};

/// Weight applied to a single occurrence in `field`.
pub(crate) fn field_weight(config: &SearchConfig, field: Field) -> f32 {
    match field {
        Field::Title => config.title_weight,
        Field::Text => config.text_weight,
    }
}

/// Multiplier for a document matching `matched_terms` distinct query terms.
///
/// `1.0` for a single matched term, growing linearly with each additional one.
pub(crate) fn coordination_factor(matched_terms: usize, weight: f32) -> f32 {
    1.0 + weight * matched_terms.saturating_sub(1) as f32
}

/// Running score of one candidate document during query evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Accumulator {
    pub(crate) raw: f32,
    pub(crate) matched_terms: usize,
    /// Index of the last query term credited to this document
    last_term: usize,
}

impl Accumulator {
    /// Starts accumulating for a document first hit by query term `term_idx`.
    pub(crate) const fn new(term_idx: usize) -> Self {
        Self {
            raw: 0.0,
            matched_terms: 1,
            last_term: term_idx,
        }
    }

    /// Adds one posting of query term `term_idx`.
    ///
    /// Query terms must be fed in increasing `term_idx` order so that each
    /// distinct term is counted once no matter how many postings it has.
    pub(crate) fn add(&mut self, config: &SearchConfig, term_idx: usize, posting: &Posting) {
        if term_idx != self.last_term {
            self.matched_terms += 1;
            self.last_term = term_idx;
        }
        self.raw += field_weight(config, posting.field) * posting.frequency as f32;
    }

    /// Final score including the coordination bonus.
    pub(crate) fn score(&self, config: &SearchConfig) -> f32 {
        self.raw * coordination_factor(self.matched_terms, config.coordination_weight)
    }
}

/// A scored candidate ready for ranking.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Candidate {
    pub(crate) doc: DocId,
    pub(crate) score: f32,
    pub(crate) matched_terms: usize,
    /// Title length in characters
    pub(crate) title_len: usize,
}

/// Ranking order: higher score, then more matched terms, then shorter title,
/// then earlier record.
pub(crate) fn rank(a: &Candidate, b: &Candidate) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| b.matched_terms.cmp(&a.matched_terms))
        .then_with(|| a.title_len.cmp(&b.title_len))
        .then_with(|| a.doc.cmp(&b.doc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::check;
    use rstest::rstest;

    fn posting(field: Field, frequency: u32) -> Posting {
        Posting {
            doc: 0,
            frequency,
            field,
        }
    }

    #[rstest]
    #[case(1, 0.5, 1.0)]
    #[case(2, 0.5, 1.5)]
    #[case(3, 0.5, 2.0)]
    #[case(4, 0.0, 1.0)]
    fn test_coordination_factor(#[case] matched: usize, #[case] weight: f32, #[case] expected: f32) {
        check!(coordination_factor(matched, weight) == expected);
    }

    #[test]
    fn test_accumulator_counts_distinct_terms_once() {
        let config = SearchConfig::default();
        let mut acc = Accumulator::new(0);
        acc.add(&config, 0, &posting(Field::Title, 1));
        acc.add(&config, 0, &posting(Field::Text, 3));
        check!(acc.matched_terms == 1);
        check!(acc.raw == 2.0 + 3.0);

        acc.add(&config, 2, &posting(Field::Text, 1));
        check!(acc.matched_terms == 2);
        check!(acc.raw == 6.0);
        check!(acc.score(&config) == 6.0 * 1.5);
    }

    #[test]
    fn test_rank_tie_breaks() {
        let base = Candidate {
            doc: 5,
            score: 2.0,
            matched_terms: 1,
            title_len: 10,
        };
        let higher = Candidate { score: 3.0, ..base };
        let more_terms = Candidate {
            matched_terms: 2,
            ..base
        };
        let shorter = Candidate {
            title_len: 4,
            ..base
        };
        let earlier = Candidate { doc: 1, ..base };

        check!(rank(&higher, &base) == Ordering::Less);
        check!(rank(&more_terms, &base) == Ordering::Less);
        check!(rank(&shorter, &base) == Ordering::Less);
        check!(rank(&earlier, &base) == Ordering::Less);
        check!(rank(&base, &base) == Ordering::Equal);
    }
}
