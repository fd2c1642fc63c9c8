//! Unified error type for the search engine core.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can occur in engine operations.
///
/// Variants map 1:1 onto the error categories the core surfaces across its
/// boundary: `InvalidDocument`, `NotAnalyzable`, `NoLexerFound`, `IndexerError`.
#[derive(Error, Debug)]
pub enum EngineError {
    /// I/O error (file read/write, directory access) encountered during traversal.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error for persisted index/indexer state.
    #[error("Serialization error: {0}")]
    Serialization(#[from] bincode::Error),

    /// `remove_document`/`update_document` referenced a path with no allocated id.
    #[error("document not indexed: {0}")]
    InvalidDocument(PathBuf),

    /// No tokenizer plugin claims this path's suffix.
    #[error("no tokenizer plugin claims suffix of {0}")]
    NotAnalyzable(PathBuf),

    /// A plugin's internal per-suffix lexer lookup failed independently of
    /// the analyzer's own suffix dispatch (see `GenericCodePlugin`).
    #[error("no lexer found for {0}")]
    NoLexerFound(PathBuf),

    /// Incoherent indexer configuration for the requested pass.
    #[error("{0}")]
    IndexerError(String),

    /// Root directory named by a group does not exist.
    #[error("root directory does not exist: {0}")]
    DirNotFound(PathBuf),

    /// A plugin raised an error outside its own declared `exceptions()`
    /// table. Unlike the categories above, this aborts the current indexing
    /// pass entirely, unlike the categories a plugin declares and recovers
    /// from on its own.
    #[error("unexpected error tokenizing {path}: {message}")]
    PluginFatal { path: PathBuf, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_display() {
        let err = EngineError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "file not found",
        ));
        assert!(err.to_string().contains("I/O error"));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn invalid_document_display_mentions_path() {
        let err = EngineError::InvalidDocument(PathBuf::from("/tmp/a.py"));
        assert!(err.to_string().contains("/tmp/a.py"));
    }

    #[test]
    fn not_analyzable_display_mentions_path() {
        let err = EngineError::NotAnalyzable(PathBuf::from("x.unknown"));
        assert!(err.to_string().contains("x.unknown"));
    }

    #[test]
    fn indexer_error_display_is_message() {
        let err = EngineError::IndexerError("Changing case-sensitivity requires a full index rebuild".to_string());
        assert_eq!(err.to_string(), "Changing case-sensitivity requires a full index rebuild");
    }

    #[test]
    fn io_error_from_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let engine_err: EngineError = io_err.into();
        assert!(matches!(engine_err, EngineError::Io(_)));
    }
}
