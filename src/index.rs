//! Dual-field inverted index: two posting tables (`code`, `text`), stable
//! integer doc ids, and an optional reverse `doc_freqs` view for cheap
//! removal.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use crate::analyzer::Analyzer;
use crate::error::EngineError;
use crate::tokenizer::Field;

pub type DocId = u32;

/// A `{code, text}` pair, used everywhere the index needs one value per
/// field without the overhead of a `HashMap<Field, T>` keyed on a two-variant
/// enum.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldTable<T> {
    pub code: T,
    pub text: T,
}

impl<T> FieldTable<T> {
    pub fn get(&self, field: Field) -> &T {
        match field {
            Field::Code => &self.code,
            Field::Text => &self.text,
        }
    }

    pub fn get_mut(&mut self, field: Field) -> &mut T {
        match field {
            Field::Code => &mut self.code,
            Field::Text => &mut self.text,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scoring {
    Unscored,
    TermFreq,
    TfIdf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetOp {
    Intersection,
    Union,
}

/// The pure-data half of the index: safe to `bincode` serialize and restore
/// without dragging the analyzer (and its plugin trait objects) along.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InvertedIndexState {
    pub docs_to_ids: HashMap<PathBuf, DocId>,
    pub ids_to_docs: Vec<Option<PathBuf>>,
    pub table: FieldTable<HashMap<String, IndexMap<DocId, u32>>>,
    pub doc_freqs: Option<FieldTable<HashMap<DocId, HashMap<String, u32>>>>,
}

pub struct InvertedIndex {
    keep_docs: bool,
    case_sensitive: FieldTable<bool>,
    state: InvertedIndexState,
}

impl InvertedIndex {
    pub fn new(keep_docs: bool, case_sensitive: FieldTable<bool>) -> Self {
        let mut state = InvertedIndexState::default();
        if keep_docs {
            state.doc_freqs = Some(FieldTable::default());
        }
        Self {
            keep_docs,
            case_sensitive,
            state,
        }
    }

    /// Discards all postings/docs and adopts a new case-sensitivity setting.
    /// Called by the indexer at the start of every full (non-partial) pass.
    pub fn clear(&mut self, case_sensitive: FieldTable<bool>) {
        let mut state = InvertedIndexState::default();
        if self.keep_docs {
            state.doc_freqs = Some(FieldTable::default());
        }
        self.state = state;
        self.case_sensitive = case_sensitive;
    }

    pub fn state(&self) -> &InvertedIndexState {
        &self.state
    }

    pub fn into_state(self) -> InvertedIndexState {
        self.state
    }

    pub fn from_state(
        state: InvertedIndexState,
        keep_docs: bool,
        case_sensitive: FieldTable<bool>,
    ) -> Self {
        Self {
            state,
            keep_docs,
            case_sensitive,
        }
    }

    fn path_for(&self, id: DocId) -> Option<PathBuf> {
        self.state.ids_to_docs.get(id as usize).cloned().flatten()
    }

    /// Merges already-analyzed `{field -> {token -> freq}}` data for `path`
    /// into the index, allocating a doc id if this path has never been seen.
    /// A duplicate add on a path that's still live is a no-op that logs and
    /// returns `false`.
    pub fn add_document_freqs(
        &mut self,
        path: &Path,
        freqs: HashMap<Field, HashMap<String, u32>>,
    ) -> bool {
        let doc_id = match self.state.docs_to_ids.get(path) {
            Some(&id) => {
                if self.state.ids_to_docs[id as usize].is_some() {
                    tracing::warn!(path = %path.display(), "ignoring duplicate add of a live document");
                    return false;
                }
                id
            }
            None => {
                let id = self.state.docs_to_ids.len() as DocId;
                self.state.docs_to_ids.insert(path.to_path_buf(), id);
                id
            }
        };

        if doc_id as usize == self.state.ids_to_docs.len() {
            self.state.ids_to_docs.push(None);
        }
        self.state.ids_to_docs[doc_id as usize] = Some(path.to_path_buf());

        for field in Field::ALL {
            let Some(field_freqs) = freqs.get(&field) else {
                continue;
            };
            if self.keep_docs {
                self.state
                    .doc_freqs
                    .as_mut()
                    .unwrap()
                    .get_mut(field)
                    .insert(doc_id, field_freqs.clone());
            }
            let index = self.state.table.get_mut(field);
            for (token, freq) in field_freqs {
                index.entry(token.clone()).or_default().insert(doc_id, *freq);
            }
        }

        true
    }

    /// Analyzes `path` and merges the result. Suffix-not-claimed and
    /// no-lexer-found are both treated as "not analyzable" and return
    /// `Ok(false)`; any other analyzer error propagates and aborts the pass.
    pub fn add_document(&mut self, path: &Path, analyzer: &Analyzer) -> Result<bool, EngineError> {
        match analyzer.analyze(path) {
            Ok(freqs) => Ok(self.add_document_freqs(path, freqs)),
            Err(EngineError::NotAnalyzable(_)) | Err(EngineError::NoLexerFound(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Removes a previously-added document. With `keep_docs` the removal
    /// touches only the tokens that document actually contributed; without it,
    /// every posting list is scanned.
    pub fn remove_document(&mut self, path: &Path) -> Result<(), EngineError> {
        let doc_id = *self
            .state
            .docs_to_ids
            .get(path)
            .ok_or_else(|| EngineError::InvalidDocument(path.to_path_buf()))?;
        self.state.ids_to_docs[doc_id as usize] = None;

        if self.keep_docs {
            let doc_freqs = self.state.doc_freqs.as_mut().unwrap();
            for field in Field::ALL {
                let Some(freqs) = doc_freqs.get_mut(field).remove(&doc_id) else {
                    continue;
                };
                let index = self.state.table.get_mut(field);
                for token in freqs.keys() {
                    if let Some(postings) = index.get_mut(token) {
                        postings.shift_remove(&doc_id);
                    }
                }
            }
        } else {
            for field in Field::ALL {
                for postings in self.state.table.get_mut(field).values_mut() {
                    postings.shift_remove(&doc_id);
                }
            }
        }
        Ok(())
    }

    /// Remove then re-add, preserving the doc id. If the document was never
    /// live (`InvalidDocument`), this degrades to a plain add.
    pub fn update_document(&mut self, path: &Path, analyzer: &Analyzer) -> Result<bool, EngineError> {
        match self.remove_document(path) {
            Ok(()) => self.add_document(path, analyzer),
            Err(EngineError::InvalidDocument(_)) => self.add_document(path, analyzer),
            Err(e) => Err(e),
        }
    }

    /// Read-only posting lookup. An unknown token returns an empty map and
    /// never inserts into the index.
    pub fn get_docs(&self, field: Field, token: &str) -> IndexMap<DocId, u32> {
        let key = if *self.case_sensitive.get(field) {
            token.to_string()
        } else {
            token.to_lowercase()
        };
        self.state
            .table
            .get(field)
            .get(&key)
            .cloned()
            .unwrap_or_default()
    }

    pub fn get_paths(&self, field: Field, token: &str, scoring: Scoring) -> Vec<(Option<PathBuf>, f64)> {
        let docs = self.get_docs(field, token);
        match scoring {
            Scoring::Unscored => docs
                .keys()
                .enumerate()
                .map(|(i, &id)| (self.path_for(id), i as f64))
                .collect(),
            Scoring::TermFreq => docs
                .iter()
                .map(|(&id, &tf)| (self.path_for(id), tf as f64))
                .collect(),
            Scoring::TfIdf => {
                if docs.is_empty() {
                    return Vec::new();
                }
                let num_docs = self.state.table.get(field).len() as f64;
                let idf = (num_docs / docs.len() as f64).log10();
                docs.iter()
                    .map(|(&id, &tf)| (self.path_for(id), tf as f64 * idf))
                    .collect()
            }
        }
    }

    /// Boolean combination of multiple tokens' posting sets. The combined
    /// set's iteration order follows first-seen order across the tokens,
    /// keeping unscored ranks deterministic for a given token order.
    pub fn get_paths_op(
        &self,
        field: Field,
        tokens: &[String],
        op: SetOp,
        scoring: Scoring,
    ) -> Vec<(Option<PathBuf>, f64)> {
        let posting_sets: Vec<IndexSet<DocId>> = tokens
            .iter()
            .map(|t| self.get_docs(field, t).keys().copied().collect())
            .collect();

        let combined: IndexSet<DocId> = match op {
            SetOp::Intersection => {
                let mut iter = posting_sets.into_iter();
                match iter.next() {
                    Some(first) => iter.fold(first, |acc, s| acc.intersection(&s).copied().collect()),
                    None => IndexSet::new(),
                }
            }
            SetOp::Union => {
                let mut combined = IndexSet::new();
                for set in posting_sets {
                    for id in set {
                        combined.insert(id);
                    }
                }
                combined
            }
        };

        match scoring {
            Scoring::Unscored => combined
                .iter()
                .enumerate()
                .map(|(i, &id)| (self.path_for(id), i as f64))
                .collect(),
            Scoring::TermFreq => {
                let mut term_freqs: HashMap<DocId, u32> = HashMap::new();
                for token in tokens {
                    for (id, tf) in self.get_docs(field, token) {
                        *term_freqs.entry(id).or_insert(0) += tf;
                    }
                }
                combined
                    .iter()
                    .map(|&id| (self.path_for(id), *term_freqs.get(&id).unwrap_or(&0) as f64))
                    .collect()
            }
            Scoring::TfIdf => {
                let num_docs = self.state.table.get(field).len() as f64;
                let mut scores: HashMap<DocId, f64> = HashMap::new();
                for token in tokens {
                    let docs = self.get_docs(field, token);
                    if docs.is_empty() {
                        continue;
                    }
                    let idf = (num_docs / docs.len() as f64).log10();
                    for (id, tf) in docs {
                        *scores.entry(id).or_insert(0.0) += tf as f64 * idf;
                    }
                }
                combined
                    .iter()
                    .map(|&id| (self.path_for(id), *scores.get(&id).unwrap_or(&0.0)))
                    .collect()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn case_sensitive_both() -> FieldTable<bool> {
        FieldTable {
            code: true,
            text: true,
        }
    }

    fn freqs(pairs: &[(&str, u32)]) -> HashMap<String, u32> {
        pairs.iter().map(|(t, f)| (t.to_string(), *f)).collect()
    }

    #[test]
    fn doc_id_is_stable_across_update() {
        let mut index = InvertedIndex::new(true, case_sensitive_both());
        let mut f = HashMap::new();
        f.insert(Field::Text, freqs(&[("alpha", 1)]));
        assert!(index.add_document_freqs(Path::new("/a.txt"), f.clone()));
        let first_id = index.state.docs_to_ids[Path::new("/a.txt")];

        index.remove_document(Path::new("/a.txt")).unwrap();
        let mut f2 = HashMap::new();
        f2.insert(Field::Text, freqs(&[("beta", 1)]));
        assert!(index.add_document_freqs(Path::new("/a.txt"), f2));
        let second_id = index.state.docs_to_ids[Path::new("/a.txt")];

        assert_eq!(first_id, second_id);
    }

    #[test]
    fn removed_document_is_tombstoned_not_deleted() {
        let mut index = InvertedIndex::new(true, case_sensitive_both());
        let mut f = HashMap::new();
        f.insert(Field::Text, freqs(&[("alpha", 1)]));
        index.add_document_freqs(Path::new("/a.txt"), f);
        index.remove_document(Path::new("/a.txt")).unwrap();

        assert!(index.get_docs(Field::Text, "alpha").is_empty());
        assert!(matches!(
            index.remove_document(Path::new("/a.txt")),
            Err(EngineError::InvalidDocument(_))
        ));
    }

    #[test]
    fn unknown_token_returns_empty_without_inserting() {
        let index = InvertedIndex::new(true, case_sensitive_both());
        assert!(index.get_docs(Field::Text, "nonexistent").is_empty());
    }

    #[test]
    fn tfidf_formula_matches_tf_times_log10_n_over_df() {
        let mut index = InvertedIndex::new(true, case_sensitive_both());
        let mut f1 = HashMap::new();
        f1.insert(Field::Text, freqs(&[("rare", 3)]));
        index.add_document_freqs(Path::new("/a.txt"), f1);
        let mut f2 = HashMap::new();
        f2.insert(Field::Text, freqs(&[("common", 1)]));
        index.add_document_freqs(Path::new("/b.txt"), f2);

        let results = index.get_paths(Field::Text, "rare", Scoring::TfIdf);
        assert_eq!(results.len(), 1);
        let expected = 3.0 * (2.0_f64 / 1.0).log10();
        assert!((results[0].1 - expected).abs() < 1e-9);
    }

    #[test]
    fn case_insensitive_field_folds_token_at_lookup() {
        let mut index = InvertedIndex::new(
            true,
            FieldTable {
                code: true,
                text: false,
            },
        );
        let mut f = HashMap::new();
        f.insert(Field::Text, freqs(&[("hello", 1)]));
        index.add_document_freqs(Path::new("/a.txt"), f);

        assert!(!index.get_docs(Field::Text, "HELLO").is_empty());
    }

    #[test]
    fn duplicate_add_on_live_document_is_a_no_op() {
        let mut index = InvertedIndex::new(true, case_sensitive_both());
        let mut f = HashMap::new();
        f.insert(Field::Text, freqs(&[("alpha", 1)]));
        assert!(index.add_document_freqs(Path::new("/a.txt"), f.clone()));
        assert!(!index.add_document_freqs(Path::new("/a.txt"), f));
    }

    #[test]
    fn intersection_requires_presence_in_every_token_set() {
        let mut index = InvertedIndex::new(true, case_sensitive_both());
        let mut fa = HashMap::new();
        fa.insert(Field::Text, freqs(&[("alpha", 1), ("beta", 1)]));
        index.add_document_freqs(Path::new("/a.txt"), fa);
        let mut fb = HashMap::new();
        fb.insert(Field::Text, freqs(&[("alpha", 1)]));
        index.add_document_freqs(Path::new("/b.txt"), fb);

        let tokens = vec!["alpha".to_string(), "beta".to_string()];
        let results = index.get_paths_op(Field::Text, &tokens, SetOp::Intersection, Scoring::Unscored);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].0, Some(PathBuf::from("/a.txt")));
    }

    #[test]
    fn state_round_trips_through_bincode() {
        let mut index = InvertedIndex::new(true, case_sensitive_both());
        let mut f = HashMap::new();
        f.insert(Field::Text, freqs(&[("alpha", 1)]));
        index.add_document_freqs(Path::new("/a.txt"), f);

        let bytes = bincode::serialize(index.state()).unwrap();
        let state: InvertedIndexState = bincode::deserialize(&bytes).unwrap();
        let restored = InvertedIndex::from_state(state, true, case_sensitive_both());
        assert!(!restored.get_docs(Field::Text, "alpha").is_empty());
    }
}
