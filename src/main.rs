use anyhow::Context;
use clap::Parser;
use documenter_search::cli::{Cli, Commands};
use documenter_search::error::Result;
use documenter_search::tracing::{LogFormat, init as init_tracing};
use documenter_search::{SearchConfig, SearchState, load_records};
use std::path::Path;

/// Maximum number of "did you mean" suggestions printed for an empty result.
const MAX_SUGGESTIONS: usize = 5;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(if cli.log_json {
        LogFormat::Json
    } else {
        LogFormat::Compact
    });

    let mut config = match &cli.config {
        Some(path) => SearchConfig::from_toml_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => SearchConfig::default(),
    };

    match cli.command {
        Commands::Search {
            index_file,
            query,
            limit,
            prefix,
            json,
        } => {
            config.prefix_last_term |= prefix;
            let state = load_state(&index_file, config)?;
            let results = state.search(&query, limit.get())?;

            if json {
                println!("{}", serde_json::to_string_pretty(&results)?);
                return Ok(());
            }

            if results.is_empty() {
                print!("{}", format_no_results(&state, &query)?);
            } else {
                print!("{}", format_results(&results, &query));
            }
        }
        Commands::Stats { index_file, top } => {
            let state = load_state(&index_file, config)?;
            let index = state.index()?;

            println!("Records indexed: {}", index.document_count());
            println!("Unique terms:    {}", index.term_count());
            println!("\nTop terms by document frequency:");
            for (term, count) in index.top_terms(top) {
                println!("  {:<24} {}", term, count);
            }
        }
    }

    Ok(())
}

/// Loads records from disk and builds the index.
fn load_state(index_file: &Path, config: SearchConfig) -> Result<SearchState> {
    let records = load_records(index_file)
        .with_context(|| format!("Failed to load records from {}", index_file.display()))?;

    let state = SearchState::new(config);
    let report = state.init(records);
    tracing::info!(
        "Loaded {} ({} indexed, {} skipped)",
        index_file.display(),
        report.indexed,
        report.skipped
    );

    Ok(state)
}

fn format_results(results: &[documenter_search::ScoredResult], query: &str) -> String {
    let mut output = format!("Search results for '{}':\n\n", query);
    let max_score = results.first().map_or(0.0, |r| r.score);

    for (idx, result) in results.iter().enumerate() {
        output.push_str(&format!(
            "{}. {} ({}) - relevance: {}%\n",
            idx + 1,
            result.title,
            result.location,
            relevance(result.score, max_score)
        ));
        if !result.snippet.is_empty() {
            output.push_str(&format!("   {}\n", result.snippet));
        }
        output.push('\n');
    }

    output
}

/// Score as a whole percentage of the top score; 0 when the top score is 0.
fn relevance(score: f32, max_score: f32) -> f32 {
    if max_score > 0.0 {
        ((score / max_score) * 100.0).round()
    } else {
        0.0
    }
}

fn format_no_results(state: &SearchState, query: &str) -> Result<String> {
    let mut msg = format!("No results found for '{}'.\n", query);

    let suggestions = state.index()?.suggest(query, MAX_SUGGESTIONS);
    if !suggestions.is_empty() {
        msg.push_str("\nDid you mean:\n");
        for suggestion in suggestions {
            msg.push_str(&format!("• {}\n", suggestion.term));
        }
    }

    Ok(msg)
}
