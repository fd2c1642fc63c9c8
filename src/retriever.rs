//! Group-scoped search + sort: filter candidate paths to those rooted under
//! the requesting group, then sort by path or score.

use std::cmp::Ordering;
use std::path::PathBuf;

use crate::analyzer::Analyzer;
use crate::config::Groups;
use crate::index::{InvertedIndex, Scoring, SetOp};
use crate::tokenizer::Field;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortBy {
    Path,
    Score,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryOp {
    And,
    Or,
}

pub struct Retriever<'a> {
    index: &'a InvertedIndex,
    groups: &'a Groups,
}

impl<'a> Retriever<'a> {
    pub fn new(index: &'a InvertedIndex, groups: &'a Groups) -> Self {
        Self { index, groups }
    }

    /// Filters out tombstoned docs (no path) and paths outside the group's
    /// roots, then sorts. An unknown group name is a programming error: the
    /// caller is expected to validate against the groups it registered.
    fn sorted(
        &self,
        group: &str,
        results: Vec<(Option<PathBuf>, f64)>,
        sort: SortBy,
    ) -> Vec<(PathBuf, f64)> {
        let roots = self
            .groups
            .get(group)
            .unwrap_or_else(|| panic!("unknown search group '{group}'"));
        let root_strs: Vec<String> = roots
            .iter()
            .map(|p| p.to_string_lossy().to_string())
            .collect();

        let mut filtered: Vec<(PathBuf, f64)> = results
            .into_iter()
            .filter_map(|(path, score)| path.map(|p| (p, score)))
            .filter(|(p, _)| {
                let s = p.to_string_lossy().to_string();
                root_strs.iter().any(|r| s.starts_with(r.as_str()))
            })
            .collect();

        match sort {
            SortBy::Path => filtered.sort_by(|a, b| a.0.cmp(&b.0)),
            SortBy::Score => {
                filtered.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal))
            }
        }
        filtered
    }

    pub fn search_token(
        &self,
        group: &str,
        field: Field,
        token: &str,
        sort: SortBy,
        scoring: Scoring,
    ) -> Vec<(PathBuf, f64)> {
        let paths = self.index.get_paths(field, token, scoring);
        self.sorted(group, paths, sort)
    }

    pub fn search_tokens_and(
        &self,
        group: &str,
        field: Field,
        tokens: &[String],
        sort: SortBy,
        scoring: Scoring,
    ) -> Vec<(PathBuf, f64)> {
        let paths = self
            .index
            .get_paths_op(field, tokens, SetOp::Intersection, scoring);
        self.sorted(group, paths, sort)
    }

    pub fn search_tokens_or(
        &self,
        group: &str,
        field: Field,
        tokens: &[String],
        sort: SortBy,
        scoring: Scoring,
    ) -> Vec<(PathBuf, f64)> {
        let paths = self.index.get_paths_op(field, tokens, SetOp::Union, scoring);
        self.sorted(group, paths, sort)
    }

    /// Runs `text` through the analyzer's query pipeline, then dispatches to
    /// a single-token or boolean multi-token search as appropriate.
    pub fn search_text(
        &self,
        group: &str,
        field: Field,
        text: &str,
        op: QueryOp,
        sort: SortBy,
        scoring: Scoring,
        analyzer: &Analyzer,
    ) -> Vec<(PathBuf, f64)> {
        let tokens = analyzer.query(field, text);
        match tokens.as_slice() {
            [] => Vec::new(),
            [single] => self.search_token(group, field, single, sort, scoring),
            _ => match op {
                QueryOp::And => self.search_tokens_and(group, field, &tokens, sort, scoring),
                QueryOp::Or => self.search_tokens_or(group, field, &tokens, sort, scoring),
            },
        }
    }
}
