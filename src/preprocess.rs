//! Turns raw lexer output into normalized terms.
//!
//! Lemmatization here is approximated with Snowball stemming via
//! `rust-stemmers`, the closest idiomatic Rust equivalent to a full
//! linguistic lemmatizer. Stemming always runs before case folding.

use std::collections::HashMap;

use rust_stemmers::{Algorithm, Stemmer};

use crate::config::FieldConfig;

pub struct Preprocessor {
    stemmer: Stemmer,
}

impl Preprocessor {
    pub fn new() -> Self {
        Self {
            stemmer: Stemmer::create(Algorithm::English),
        }
    }

    /// Split on non-alphanumeric/underscore runs. Case folding is a per-field
    /// config decision, applied separately in `normalize`, not baked in here.
    fn split_words(text: &str) -> Vec<String> {
        text.split(|c: char| !(c.is_alphanumeric() || c == '_'))
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string())
            .collect()
    }

    fn normalize(&self, config: &FieldConfig, word: &str) -> String {
        let base = if config.lemmatize {
            self.stemmer.stem(word).into_owned()
        } else {
            word.to_string()
        };
        if config.case_sensitive {
            base
        } else {
            base.to_lowercase()
        }
    }

    /// Pure function: same `(config, text)` always yields the same sequence.
    /// An empty input always yields an empty sequence, overriding the literal
    /// `"".split(" ") == [""]` behavior the non-tokenizing branch would
    /// otherwise inherit.
    pub fn preprocess_text(&self, config: &FieldConfig, text: &str) -> Vec<String> {
        config.validate();
        if text.is_empty() {
            return Vec::new();
        }
        if config.tokenize {
            Self::split_words(text)
                .iter()
                .map(|w| self.normalize(config, w))
                .collect()
        } else if config.case_sensitive {
            text.split(' ').map(|s| s.to_string()).collect()
        } else {
            text.split(' ').map(|s| s.to_lowercase()).collect()
        }
    }

    /// Runs `preprocess_text` over each item and accumulates term counts into
    /// `freqs`, equivalent to iterating and counting by hand.
    pub fn preprocess_batch(
        &self,
        config: &FieldConfig,
        texts: &[String],
        freqs: &mut HashMap<String, u32>,
    ) {
        for text in texts {
            for term in self.preprocess_text(config, text) {
                *freqs.entry(term).or_insert(0) += 1;
            }
        }
    }
}

impl Default for Preprocessor {
    fn default() -> Self {
        Self::new()
    }
}
