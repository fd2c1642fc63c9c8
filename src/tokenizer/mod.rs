//! Tokenizer plugins: per-suffix lexing of a source file into `(field, raw
//! token)` pairs, then handed to the preprocessing pipeline.

pub mod ecmascript;
pub mod generic_code;
pub mod plaintext;
pub mod python;

use std::collections::HashMap;
use std::path::Path;

use crate::config::PreprocessConfig;
use crate::error::EngineError;
use crate::preprocess::Preprocessor;

/// The two fields every plugin emits into: identifiers/numbers are `code`,
/// strings/comments/prose are `text`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Field {
    Code,
    Text,
}

impl Field {
    pub const ALL: [Field; 2] = [Field::Code, Field::Text];

    pub fn as_str(self) -> &'static str {
        match self {
            Field::Code => "code",
            Field::Text => "text",
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Marker category used by a plugin's own lexer to request escalation to
/// `EngineError::NoLexerFound` instead of the ordinary skip-with-warning path.
/// Distinct from the plugin's declared `exceptions()` table: a missing
/// per-suffix lexer inside a plugin is not "this file failed to parse", it's
/// "this plugin doesn't actually know this suffix".
pub const CATEGORY_NO_LEXER_FOUND: &str = "NoLexerFound";

/// A raw lexing failure, tagged with the category a plugin's `exceptions()`
/// table is keyed on.
#[derive(Debug)]
pub struct LexError {
    pub category: &'static str,
    pub detail: String,
}

impl LexError {
    pub fn new(category: &'static str, detail: impl Into<String>) -> Self {
        Self {
            category,
            detail: detail.into(),
        }
    }
}

/// A suffix-claiming lexer/tokenizer plugin.
pub trait TokenizerPlugin: Send + Sync {
    /// Suffixes this plugin claims, each including the leading dot (`.py`).
    fn suffixes(&self) -> &'static [&'static str];

    /// `(category, message template)` pairs. A lex error whose category
    /// appears here is logged and the file is skipped; any other category
    /// is fatal and bubbles up to the indexer.
    fn exceptions(&self) -> &'static [(&'static str, &'static str)];

    /// Emit raw `(field, token)` pairs for a file, or a categorized failure.
    fn lex(&self, path: &Path) -> Result<Vec<(Field, String)>, LexError>;

    /// Lex, classify failures, then preprocess into per-field term
    /// frequencies. Plugins get this for free; only `lex` needs overriding.
    fn tokenize(
        &self,
        path: &Path,
        preprocessor: &Preprocessor,
        config: &PreprocessConfig,
    ) -> Result<HashMap<Field, HashMap<String, u32>>, EngineError> {
        let raw = match self.lex(path) {
            Ok(pairs) => pairs,
            Err(e) if e.category == CATEGORY_NO_LEXER_FOUND => {
                return Err(EngineError::NoLexerFound(path.to_path_buf()));
            }
            Err(e) => {
                if let Some((_, template)) =
                    self.exceptions().iter().find(|(cat, _)| *cat == e.category)
                {
                    let message = template
                        .replace("{path}", &path.display().to_string())
                        .replace("{exc}", &e.detail);
                    tracing::warn!("{message}");
                    Vec::new()
                } else {
                    return Err(EngineError::PluginFatal {
                        path: path.to_path_buf(),
                        message: format!("{}: {}", e.category, e.detail),
                    });
                }
            }
        };

        let mut grouped: HashMap<Field, Vec<String>> = HashMap::new();
        for (field, token) in raw {
            grouped.entry(field).or_default().push(token);
        }

        let mut freqs = HashMap::new();
        for field in Field::ALL {
            let texts = grouped.remove(&field).unwrap_or_default();
            let mut counter = HashMap::new();
            preprocessor.preprocess_batch(config.field(field), &texts, &mut counter);
            freqs.insert(field, counter);
        }
        Ok(freqs)
    }
}
