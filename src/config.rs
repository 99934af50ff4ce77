//! Tunable parameters for tokenization and ranking.
//!
//! Defaults reproduce the behavior of a plain documentation search widget:
//! title hits count double, tokens shorter than two characters and a handful
//! of English stop words are dropped, and no stemming is applied.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default stop words. These high-frequency words add little value to search relevance.
pub const DEFAULT_STOP_WORDS: &[&str] = &[
    "an", "and", "are", "as", "at", "be", "by", "for", "from", "has", "in", "is", "it", "its", "of",
    "on", "or", "that", "the", "to", "was", "will", "with",
];

/// Default field weight for title matches.
pub const DEFAULT_TITLE_WEIGHT: f32 = 2.0;

/// Default field weight for body text matches.
pub const DEFAULT_TEXT_WEIGHT: f32 = 1.0;

/// Default bonus factor applied per additional distinct matched query term.
pub const DEFAULT_COORDINATION_WEIGHT: f32 = 0.5;

/// Default minimum token length, in characters.
pub const DEFAULT_MIN_TOKEN_LEN: usize = 2;

/// Default maximum snippet length, in characters.
pub const DEFAULT_SNIPPET_CHARS: usize = 160;

/// Search configuration shared by the index builder and the query engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchConfig {
    /// Weight of a term occurrence in a record title
    pub title_weight: f32,
    /// Weight of a term occurrence in a record body
    pub text_weight: f32,
    /// Score multiplier per extra matched query term: `1 + w * (matched - 1)`
    pub coordination_weight: f32,
    /// Tokens shorter than this many characters are dropped
    pub min_token_len: usize,
    /// Lowercase words dropped from both records and queries
    pub stop_words: Vec<String>,
    /// Apply English Snowball stemming to every term
    pub stemming: bool,
    /// Let the final query term match any indexed term it is a prefix of
    pub prefix_last_term: bool,
    /// Maximum snippet length in characters
    pub snippet_chars: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            title_weight: DEFAULT_TITLE_WEIGHT,
            text_weight: DEFAULT_TEXT_WEIGHT,
            coordination_weight: DEFAULT_COORDINATION_WEIGHT,
            min_token_len: DEFAULT_MIN_TOKEN_LEN,
            stop_words: DEFAULT_STOP_WORDS.iter().map(ToString::to_string).collect(),
            stemming: false,
            prefix_last_term: false,
            snippet_chars: DEFAULT_SNIPPET_CHARS,
        }
    }
}

impl SearchConfig {
    /// Parses a TOML document. Missing keys keep their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a TOML configuration file.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Rejects values that would make scoring or tokenization meaningless.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("title_weight", self.title_weight),
            ("text_weight", self.text_weight),
            ("coordination_weight", self.coordination_weight),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("expected a finite, non-negative number, got {}", value),
                });
            }
        }

        if self.title_weight <= 0.0 && self.text_weight <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "text_weight",
                reason: "title_weight and text_weight cannot both be zero".to_string(),
            });
        }

        if self.min_token_len == 0 {
            return Err(ConfigError::Invalid {
                field: "min_token_len",
                reason: "must be at least 1".to_string(),
            });
        }

        if self.snippet_chars == 0 {
            return Err(ConfigError::Invalid {
                field: "snippet_chars",
                reason: "must be at least 1".to_string(),
            });
        }

        Ok(())
    }
}
