//! Plain prose files: the whole file is one blob of `text`, no `code` field.

use std::path::Path;

use super::{Field, LexError, TokenizerPlugin};

const SUFFIXES: &[&str] = &[".txt", ".md", ".rst"];

pub struct PlaintextPlugin {
    pub max_file_size: u64,
}

impl Default for PlaintextPlugin {
    fn default() -> Self {
        Self {
            max_file_size: 1_000_000,
        }
    }
}

impl TokenizerPlugin for PlaintextPlugin {
    fn suffixes(&self) -> &'static [&'static str] {
        SUFFIXES
    }

    fn exceptions(&self) -> &'static [(&'static str, &'static str)] {
        &[("ValueError", "skipping oversized file {path}: {exc}")]
    }

    fn lex(&self, path: &Path) -> Result<Vec<(Field, String)>, LexError> {
        let metadata =
            std::fs::metadata(path).map_err(|e| LexError::new("Io", e.to_string()))?;
        if metadata.len() > self.max_file_size {
            return Err(LexError::new(
                "ValueError",
                format!(
                    "file size {} exceeds maximum of {}",
                    metadata.len(),
                    self.max_file_size
                ),
            ));
        }
        let content =
            std::fs::read_to_string(path).map_err(|e| LexError::new("Io", e.to_string()))?;
        Ok(vec![(Field::Text, content)])
    }
}
