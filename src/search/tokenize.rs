//! Text tokenization and normalization shared by indexing and querying.

use crate::config::SearchConfig;
use ahash::AHashSet;
use rust_stemmers::{Algorithm, Stemmer};
use std::ops::Range;

/// A normalized term together with the byte range it was cut from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub term: String,
    pub span: Range<usize>,
}

/// Splits text into normalized terms.
///
/// Rules, applied in order:
/// 1. split on every non-alphanumeric character
/// 2. drop pieces shorter than `min_token_len` characters
/// 3. lowercase
/// 4. drop stop words
/// 5. stem (only when enabled)
///
/// The same `Tokenizer` is stored in the index it builds so that queries are
/// always normalized exactly like the records were.
pub struct Tokenizer {
    min_token_len: usize,
    stop_words: AHashSet<String>,
    stemmer: Option<Stemmer>,
}

impl std::fmt::Debug for Tokenizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tokenizer")
            .field("min_token_len", &self.min_token_len)
            .field("stop_words", &self.stop_words.len())
            .field("stemming", &self.stemmer.is_some())
            .finish()
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new(&SearchConfig::default())
    }
}

impl Tokenizer {
    pub fn new(config: &SearchConfig) -> Self {
        Self {
            min_token_len: config.min_token_len,
            stop_words: config.stop_words.iter().map(|w| w.to_lowercase()).collect(),
            stemmer: config
                .stemming
                .then(|| Stemmer::create(Algorithm::English)),
        }
    }

    /// Returns the normalized terms of `text`, in order, duplicates included.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        self.tokens(text).into_iter().map(|token| token.term).collect()
    }

    /// Like [`Tokenizer::tokenize`], but keeps each term's source byte range.
    pub fn tokens(&self, text: &str) -> Vec<Token> {
        let mut tokens = vec![];
        let mut word_start = None;

        for (i, c) in text.char_indices() {
            if c.is_alphanumeric() {
                word_start.get_or_insert(i);
            } else if let Some(start) = word_start.take() {
                self.push_token(text, start..i, &mut tokens);
            }
        }

        // Final word has no trailing separator
        if let Some(start) = word_start {
            self.push_token(text, start..text.len(), &mut tokens);
        }

        tokens
    }

    /// Normalizes a single already-split word. Returns `None` if it is filtered out.
    pub fn normalize(&self, word: &str) -> Option<String> {
        if word.chars().count() < self.min_token_len {
            return None;
        }

        let lowercase = word.to_lowercase();
        if self.stop_words.contains(&lowercase) {
            return None;
        }

        Some(match &self.stemmer {
            Some(stemmer) => stemmer.stem(&lowercase).into_owned(),
            None => lowercase,
        })
    }

    fn push_token(&self, text: &str, span: Range<usize>, tokens: &mut Vec<Token>) {
        if let Some(term) = self.normalize(&text[span.clone()]) {
            tokens.push(Token { term, span });
        }
    }
}
