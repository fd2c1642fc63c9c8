//! Personal desktop search engine core: a dual-field inverted index over
//! source code and prose, an incremental filesystem indexer, and the
//! tokenizer/analyzer pipeline that feeds it.
//!
//! This crate is the engine only. Reading a config file from disk,
//! persisting the index between runs, watching the filesystem for changes,
//! and exposing a network-facing API are all collaborator concerns left to
//! callers (the `deskgrep` binary is a minimal example of one).

pub mod analyzer;
pub mod config;
pub mod engine;
pub mod error;
pub mod index;
pub mod indexer;
pub mod preprocess;
pub mod retriever;
pub mod tokenizer;

pub use analyzer::Analyzer;
pub use config::{FieldConfig, Groups, IndexerConfig, PreprocessConfig};
pub use engine::Engine;
pub use error::EngineError;
pub use index::{DocId, FieldTable, InvertedIndex, InvertedIndexState, Scoring, SetOp};
pub use indexer::{IndexCounts, Indexer, IndexerState};
pub use preprocess::Preprocessor;
pub use retriever::{QueryOp, Retriever, SortBy};
pub use tokenizer::{Field, TokenizerPlugin};
