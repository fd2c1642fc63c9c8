//! Owns the analyzer, index, and indexer as one explicit, owned bundle a
//! caller constructs and threads through, rather than reaching for
//! process-global state.

use std::path::Path;

use crate::analyzer::Analyzer;
use crate::config::{Groups, IndexerConfig, PreprocessConfig};
use crate::error::EngineError;
use crate::index::{FieldTable, InvertedIndex};
use crate::indexer::{IndexCounts, Indexer};
use crate::retriever::Retriever;

pub struct Engine {
    pub analyzer: Analyzer,
    pub index: InvertedIndex,
    pub indexer: Indexer,
}

impl Engine {
    pub fn new(preprocess: PreprocessConfig, keep_docs: bool) -> Self {
        let case_sensitive = FieldTable {
            code: preprocess.code.case_sensitive,
            text: preprocess.text.case_sensitive,
        };
        Self {
            analyzer: Analyzer::with_default_plugins(preprocess),
            index: InvertedIndex::new(keep_docs, case_sensitive),
            indexer: Indexer::new(),
        }
    }

    pub fn set_groups(&mut self, groups: Groups) {
        self.indexer.set_groups(groups);
    }

    pub fn run_index(
        &mut self,
        config: IndexerConfig,
        progress: Option<&mut dyn FnMut(&Path)>,
    ) -> Result<IndexCounts, EngineError> {
        self.indexer
            .index(&mut self.index, &mut self.analyzer, config, progress)
    }

    pub fn retriever(&self) -> Retriever<'_> {
        Retriever::new(&self.index, &self.indexer.state.groups)
    }

    /// Re-attaches a freshly constructed analyzer after restoring persisted
    /// `InvertedIndexState`/`IndexerState` from a collaborator's storage —
    /// the analyzer itself (plugin trait objects) is never serialized.
    pub fn attach_analyzer(&mut self, analyzer: Analyzer) {
        self.analyzer = analyzer;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::Scoring;
    use crate::retriever::{QueryOp, SortBy};
    use crate::tokenizer::Field;
    use std::collections::HashSet;
    use std::fs;

    #[test]
    fn index_then_search_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("notes.txt"), "indexing engines are fun").unwrap();

        let mut engine = Engine::new(PreprocessConfig::default(), true);
        let mut groups = Groups::new();
        groups.insert("default".to_string(), HashSet::from([dir.path().to_path_buf()]));
        engine.set_groups(groups);

        let config = IndexerConfig {
            suffixes: HashSet::new(),
            partial: false,
            gitignore: false,
            preprocess: PreprocessConfig::default(),
        };
        let counts = engine.run_index(config, None).unwrap();
        assert_eq!(counts.added, 1);

        let retriever = engine.retriever();
        let results = retriever.search_text(
            "default",
            Field::Text,
            "engines",
            QueryOp::Or,
            SortBy::Score,
            Scoring::TfIdf,
            &engine.analyzer,
        );
        assert_eq!(results.len(), 1);
        assert!(results[0].0.ends_with("notes.txt"));
    }
}
