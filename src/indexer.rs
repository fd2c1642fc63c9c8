//! Incremental traversal + mtime-diff classification. Walks each group's
//! roots, classifies every file as add/update/remove/unchanged by comparing
//! mtimes, and composes `.gitignore` scoping via the `ignore` crate's
//! `WalkBuilder`.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use ignore::WalkBuilder;
use serde::{Deserialize, Serialize};

use crate::analyzer::Analyzer;
use crate::config::{Groups, IndexerConfig};
use crate::error::EngineError;
use crate::index::{FieldTable, InvertedIndex};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndexCounts {
    pub added: usize,
    pub removed: usize,
    pub updated: usize,
}

/// The indexer's own persisted state: per-path mtimes and the group/root
/// table they were observed under.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IndexerState {
    pub mtimes: HashMap<PathBuf, u128>,
    pub groups: Groups,
}

pub struct Indexer {
    pub state: IndexerState,
}

impl Default for Indexer {
    fn default() -> Self {
        Self::new()
    }
}

fn mtime_ns(metadata: &std::fs::Metadata) -> u128 {
    metadata
        .modified()
        .ok()
        .and_then(|t| t.duration_since(std::time::UNIX_EPOCH).ok())
        .map(|d| d.as_nanos())
        .unwrap_or(0)
}

fn case_sensitivity_from(config: &crate::config::PreprocessConfig) -> FieldTable<bool> {
    FieldTable {
        code: config.code.case_sensitive,
        text: config.text.case_sensitive,
    }
}

impl Indexer {
    pub fn new() -> Self {
        Self {
            state: IndexerState::default(),
        }
    }

    pub fn set_groups(&mut self, groups: Groups) {
        self.state.groups = groups;
    }

    /// Runs one indexing pass over every root in every group. A non-partial
    /// pass clears the index and adopts `config.preprocess` as the active
    /// configuration; a partial pass requires the active configuration to be
    /// unchanged and only classifies files whose mtime moved since the last
    /// pass.
    pub fn index(
        &mut self,
        index: &mut InvertedIndex,
        analyzer: &mut Analyzer,
        config: IndexerConfig,
        mut progress: Option<&mut dyn FnMut(&Path)>,
    ) -> Result<IndexCounts, EngineError> {
        if config.partial {
            if analyzer.config() != &config.preprocess {
                return Err(EngineError::IndexerError(
                    "changing token normalization requires a full index rebuild".to_string(),
                ));
            }
        } else {
            index.clear(case_sensitivity_from(&config.preprocess));
            analyzer.set_config(config.preprocess.clone());
            self.state.mtimes.clear();
        }

        let mut counts = IndexCounts::default();
        let mut touched: HashSet<PathBuf> = HashSet::new();

        for roots in self.state.groups.values() {
            for root in roots {
                if !root.exists() {
                    return Err(EngineError::DirNotFound(root.clone()));
                }

                let mut builder = WalkBuilder::new(root);
                builder
                    .hidden(false)
                    .git_ignore(config.gitignore)
                    .git_global(config.gitignore)
                    .git_exclude(config.gitignore)
                    .ignore(config.gitignore);

                for entry in builder.build() {
                    let entry = entry.map_err(|e| {
                        EngineError::Io(std::io::Error::other(e.to_string()))
                    })?;

                    if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                        continue;
                    }
                    let path = entry.path();
                    if path.components().any(|c| c.as_os_str() == ".git") {
                        continue;
                    }

                    if !config.suffixes.is_empty() {
                        let suffix = path
                            .extension()
                            .map(|e| format!(".{}", e.to_string_lossy().to_lowercase()))
                            .unwrap_or_default();
                        if !config.suffixes.contains(&suffix) {
                            continue;
                        }
                    }

                    let metadata = entry
                        .metadata()
                        .map_err(|e| EngineError::Io(std::io::Error::other(e.to_string())))?;
                    let new_mtime = mtime_ns(&metadata);
                    let path_buf = path.to_path_buf();

                    let mut do_add = !config.partial;

                    if config.partial {
                        touched.insert(path_buf.clone());
                        match self.state.mtimes.get(&path_buf).copied() {
                            None => do_add = true,
                            Some(old_mtime) if old_mtime == new_mtime => {}
                            Some(_) => match index.update_document(&path_buf, analyzer) {
                                Ok(true) => counts.updated += 1,
                                Ok(false) => counts.removed += 1,
                                Err(EngineError::InvalidDocument(_)) => do_add = true,
                                Err(e) => return Err(e),
                            },
                        }
                    }

                    if do_add {
                        self.state.mtimes.insert(path_buf.clone(), new_mtime);
                        match index.add_document(&path_buf, analyzer) {
                            Ok(true) => {
                                counts.added += 1;
                                if let Some(cb) = progress.as_deref_mut() {
                                    cb(&path_buf);
                                }
                            }
                            Ok(false) => {}
                            Err(e) => return Err(e),
                        }
                    } else if config.partial {
                        self.state.mtimes.insert(path_buf.clone(), new_mtime);
                    }
                }
            }
        }

        if config.partial {
            let deleted: Vec<PathBuf> = self
                .state
                .mtimes
                .keys()
                .filter(|p| !touched.contains(*p))
                .cloned()
                .collect();
            for path in deleted {
                index.remove_document(&path)?;
                self.state.mtimes.remove(&path);
                counts.removed += 1;
            }
        }

        Ok(counts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PreprocessConfig;
    use crate::index::FieldTable;
    use std::fs;

    fn groups_for(dir: &Path) -> Groups {
        let mut groups = Groups::new();
        groups.insert("default".to_string(), HashSet::from([dir.to_path_buf()]));
        groups
    }

    fn config(partial: bool) -> IndexerConfig {
        IndexerConfig {
            suffixes: HashSet::new(),
            partial,
            gitignore: false,
            preprocess: PreprocessConfig::default(),
        }
    }

    #[test]
    fn full_pass_indexes_all_matching_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), "hello world").unwrap();
        fs::write(dir.path().join("b.py"), "def f():\n    pass").unwrap();

        let mut indexer = Indexer::new();
        indexer.set_groups(groups_for(dir.path()));
        let mut analyzer = Analyzer::with_default_plugins(PreprocessConfig::default());
        let mut index = InvertedIndex::new(
            true,
            FieldTable {
                code: true,
                text: false,
            },
        );

        let counts = indexer
            .index(&mut index, &mut analyzer, config(false), None)
            .unwrap();
        assert_eq!(counts.added, 2);
    }

    #[test]
    fn partial_pass_skips_unchanged_files() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a.txt");
        fs::write(&file, "hello").unwrap();

        let mut indexer = Indexer::new();
        indexer.set_groups(groups_for(dir.path()));
        let mut analyzer = Analyzer::with_default_plugins(PreprocessConfig::default());
        let mut index = InvertedIndex::new(
            true,
            FieldTable {
                code: true,
                text: false,
            },
        );

        indexer
            .index(&mut index, &mut analyzer, config(false), None)
            .unwrap();
        let second = indexer
            .index(&mut index, &mut analyzer, config(true), None)
            .unwrap();
        assert_eq!(second.added, 0);
        assert_eq!(second.updated, 0);
        assert_eq!(second.removed, 0);
    }

    #[test]
    fn partial_pass_removes_deleted_files() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a.txt");
        fs::write(&file, "hello").unwrap();

        let mut indexer = Indexer::new();
        indexer.set_groups(groups_for(dir.path()));
        let mut analyzer = Analyzer::with_default_plugins(PreprocessConfig::default());
        let mut index = InvertedIndex::new(
            true,
            FieldTable {
                code: true,
                text: false,
            },
        );

        indexer
            .index(&mut index, &mut analyzer, config(false), None)
            .unwrap();
        fs::remove_file(&file).unwrap();
        let second = indexer
            .index(&mut index, &mut analyzer, config(true), None)
            .unwrap();
        assert_eq!(second.removed, 1);
    }

    #[test]
    fn partial_pass_rejects_incoherent_config() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), "hello").unwrap();

        let mut indexer = Indexer::new();
        indexer.set_groups(groups_for(dir.path()));
        let mut analyzer = Analyzer::with_default_plugins(PreprocessConfig::default());
        let mut index = InvertedIndex::new(
            true,
            FieldTable {
                code: true,
                text: false,
            },
        );

        indexer
            .index(&mut index, &mut analyzer, config(false), None)
            .unwrap();

        let mut mismatched = config(true);
        mismatched.preprocess.text.case_sensitive = true;
        let result = indexer.index(&mut index, &mut analyzer, mismatched, None);
        assert!(matches!(result, Err(EngineError::IndexerError(_))));
    }

    #[test]
    fn missing_root_is_dir_not_found() {
        let mut indexer = Indexer::new();
        indexer.set_groups(groups_for(Path::new("/nonexistent/root/path")));
        let mut analyzer = Analyzer::with_default_plugins(PreprocessConfig::default());
        let mut index = InvertedIndex::new(
            true,
            FieldTable {
                code: true,
                text: false,
            },
        );

        let result = indexer.index(&mut index, &mut analyzer, config(false), None);
        assert!(matches!(result, Err(EngineError::DirNotFound(_))));
    }
}
