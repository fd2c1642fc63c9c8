//! CLI argument structs for all subcommands.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(
    name = "deskgrep",
    version,
    about = "Personal desktop search engine: dual-field inverted index over source code and prose"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Index one or more root directories and report add/update/remove counts.
    Index(IndexArgs),
    /// Index, then run a single query against the result.
    #[command(after_long_help = r#"EXAMPLES:
  Prose search:        deskgrep search . "inverted index" --field text
  Identifier search:   deskgrep search . retriever --field code --ext rs,py
  AND of query terms:  deskgrep search . "partial rebuild" --op and
  Raw term frequency:  deskgrep search . cache --scoring term-freq
  Stable path order:   deskgrep search . cache --sort path

NOTES:
  - Each invocation re-indexes the given roots from scratch; nothing is
    persisted between runs (persistence is a collaborator's concern).
  - --field selects which half of the dual-field index is searched: `code`
    (identifiers, numbers) or `text` (comments, strings, prose).
"#)]
    Search(SearchArgs),
}

#[derive(Parser, Debug)]
pub struct IndexArgs {
    /// Root directories to index.
    #[arg(required = true)]
    pub roots: Vec<PathBuf>,

    /// Group name these roots are indexed under.
    #[arg(short, long, default_value = "default")]
    pub group: String,

    /// File suffixes to index, comma-separated without dots (e.g. "py,js,txt").
    /// Unset means no suffix filter.
    #[arg(short, long, value_delimiter = ',')]
    pub ext: Vec<String>,

    /// Honor .gitignore while walking.
    #[arg(long)]
    pub gitignore: bool,
}

#[derive(Parser, Debug)]
pub struct SearchArgs {
    #[command(flatten)]
    pub index: IndexArgs,

    /// Query text.
    pub query: String,

    /// Field to search.
    #[arg(long, value_enum, default_value_t = FieldArg::Text)]
    pub field: FieldArg,

    /// How to combine multiple query terms.
    #[arg(long, value_enum, default_value_t = OpArg::Or)]
    pub op: OpArg,

    /// Scoring mode.
    #[arg(long, value_enum, default_value_t = ScoringArg::Tfidf)]
    pub scoring: ScoringArg,

    /// Result order.
    #[arg(long, value_enum, default_value_t = SortArg::Score)]
    pub sort: SortArg,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum FieldArg {
    Code,
    Text,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum OpArg {
    And,
    Or,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum ScoringArg {
    Unscored,
    TermFreq,
    Tfidf,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum SortArg {
    Path,
    Score,
}
