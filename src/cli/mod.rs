//! CLI layer: argument parsing, command dispatch, and subcommand implementations.

pub mod args;
pub use args::*;

use std::collections::HashSet;
use std::time::Instant;

use clap::Parser;
use tracing::info;

use deskgrep::{
    Engine, EngineError, Field, Groups, IndexCounts, IndexerConfig, PreprocessConfig, QueryOp,
    Scoring, SortBy,
};

pub fn run() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Index(args) => cmd_index(args).map(|_| ()),
        Commands::Search(args) => cmd_search(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn groups_for(group: &str, roots: &[std::path::PathBuf]) -> Groups {
    let mut groups = Groups::new();
    groups.insert(group.to_string(), roots.iter().cloned().collect());
    groups
}

fn build_and_index(args: &IndexArgs) -> Result<(Engine, IndexCounts), EngineError> {
    let preprocess = PreprocessConfig::default();
    let mut engine = Engine::new(preprocess.clone(), true);
    engine.set_groups(groups_for(&args.group, &args.roots));

    let suffixes: HashSet<String> = args
        .ext
        .iter()
        .map(|e| format!(".{}", e.trim_start_matches('.').to_lowercase()))
        .collect();

    let config = IndexerConfig {
        suffixes,
        partial: false,
        gitignore: args.gitignore,
        preprocess,
    };

    let start = Instant::now();
    let counts = engine.run_index(config, None)?;
    info!(
        elapsed_ms = start.elapsed().as_millis() as u64,
        added = counts.added,
        "indexing complete"
    );
    Ok((engine, counts))
}

fn cmd_index(args: IndexArgs) -> Result<IndexCounts, EngineError> {
    let (_, counts) = build_and_index(&args)?;
    eprintln!(
        "added={} removed={} updated={}",
        counts.added, counts.removed, counts.updated
    );
    Ok(counts)
}

fn cmd_search(args: SearchArgs) -> Result<(), EngineError> {
    let start = Instant::now();
    let (engine, counts) = build_and_index(&args.index)?;
    let load_elapsed = start.elapsed();

    let field = match args.field {
        FieldArg::Code => Field::Code,
        FieldArg::Text => Field::Text,
    };
    let op = match args.op {
        OpArg::And => QueryOp::And,
        OpArg::Or => QueryOp::Or,
    };
    let scoring = match args.scoring {
        ScoringArg::Unscored => Scoring::Unscored,
        ScoringArg::TermFreq => Scoring::TermFreq,
        ScoringArg::Tfidf => Scoring::TfIdf,
    };
    let sort = match args.sort {
        SortArg::Path => SortBy::Path,
        SortArg::Score => SortBy::Score,
    };

    let search_start = Instant::now();
    let retriever = engine.retriever();
    let results = retriever.search_text(
        &args.index.group,
        field,
        &args.query,
        op,
        sort,
        scoring,
        &engine.analyzer,
    );
    let search_elapsed = search_start.elapsed();

    for (path, score) in &results {
        println!("[{:.4}] {}", score, path.display());
    }

    eprintln!(
        "\n{} match(es) for '{}' in field {:?} (indexed {} file(s))",
        results.len(),
        args.query,
        field,
        counts.added
    );
    eprintln!(
        "Index: {:.3}s | Search: {:.6}s",
        load_elapsed.as_secs_f64(),
        search_elapsed.as_secs_f64()
    );
    Ok(())
}
