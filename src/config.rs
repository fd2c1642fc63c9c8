//! Wire-shaped configuration consumed from an external loader (§6).
//!
//! These structs are the fixed boundary shape; loading them from a config
//! file on disk is a collaborator's concern and is not implemented here.

use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::tokenizer::Field;

/// Per-field preprocessor configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldConfig {
    /// Run linguistic tokenization/stemming; if false, split on a single space.
    pub tokenize: bool,
    #[serde(rename = "case-sensitive")]
    pub case_sensitive: bool,
    /// Meaningful only when `tokenize` is true. Implemented via Snowball
    /// stemming rather than a full linguistic lemmatizer.
    #[serde(default)]
    pub lemmatize: bool,
}

impl FieldConfig {
    /// `tokenize=false` requires `lemmatize=false`; violating this is a
    /// programming error, asserted rather than silently ignored.
    pub fn validate(&self) {
        debug_assert!(
            self.tokenize || !self.lemmatize,
            "lemmatize requires tokenize=true"
        );
    }
}

/// `{ "code": {...}, "text": {...} }` — only these two top-level keys are
/// recognized; any other key is a deserialization error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PreprocessConfig {
    pub code: FieldConfig,
    pub text: FieldConfig,
}

impl PreprocessConfig {
    pub fn field(&self, field: Field) -> &FieldConfig {
        match field {
            Field::Code => &self.code,
            Field::Text => &self.text,
        }
    }
}

impl Default for PreprocessConfig {
    /// Code is split on raw whitespace and case-sensitive; text is
    /// tokenized, lowercased, and lemmatized.
    fn default() -> Self {
        PreprocessConfig {
            code: FieldConfig {
                tokenize: false,
                case_sensitive: true,
                lemmatize: false,
            },
            text: FieldConfig {
                tokenize: true,
                case_sensitive: false,
                lemmatize: true,
            },
        }
    }
}

/// Per-call indexer configuration.
#[derive(Debug, Clone, Default)]
pub struct IndexerConfig {
    /// Empty means "no suffix filter".
    pub suffixes: std::collections::HashSet<String>,
    pub partial: bool,
    pub gitignore: bool,
    pub preprocess: PreprocessConfig,
}

/// `groups[name] = set of root paths`, used to scope search results.
pub type Groups = HashMap<String, std::collections::HashSet<PathBuf>>;

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG_JSON: &str = r#"{
        "code": { "tokenize": false, "case-sensitive": true },
        "text": { "tokenize": true, "case-sensitive": false, "lemmatize": true }
    }"#;

    #[test]
    fn parses_spec_shape() {
        let cfg: PreprocessConfig = serde_json::from_str(CONFIG_JSON).unwrap();
        assert!(!cfg.code.tokenize);
        assert!(cfg.code.case_sensitive);
        assert!(!cfg.code.lemmatize);
        assert!(cfg.text.tokenize);
        assert!(!cfg.text.case_sensitive);
        assert!(cfg.text.lemmatize);
    }

    #[test]
    fn rejects_unknown_top_level_key() {
        let json = r#"{
            "code": { "tokenize": false, "case-sensitive": true },
            "text": { "tokenize": true, "case-sensitive": false },
            "extra": {}
        }"#;
        let result: Result<PreprocessConfig, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn round_trips_through_json() {
        let cfg = PreprocessConfig::default();
        let json = serde_json::to_string(&cfg).unwrap();
        let back: PreprocessConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(cfg, back);
    }

    #[test]
    fn default_matches_original_system_defaults() {
        let cfg = PreprocessConfig::default();
        assert!(!cfg.code.tokenize);
        assert!(cfg.code.case_sensitive);
        assert!(cfg.text.tokenize);
        assert!(!cfg.text.case_sensitive);
        assert!(cfg.text.lemmatize);
    }
}
