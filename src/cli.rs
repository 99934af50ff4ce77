use clap::{Parser, Subcommand};
use std::num::NonZeroUsize;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "docsearch")]
#[command(about = "Search a documentation site's search index", long_about = None)]
pub struct Cli {
    /// TOML file overriding the default search configuration
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub log_json: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a query and print ranked results
    Search {
        /// Path to the generator's `search_index.js` (or plain JSON records)
        index_file: PathBuf,
        query: String,
        #[arg(short = 'n', long, default_value = "10")]
        limit: NonZeroUsize,
        /// Treat the last query word as a prefix (search-as-you-type)
        #[arg(long)]
        prefix: bool,
        /// Print results as JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Print index statistics
    Stats {
        index_file: PathBuf,
        /// Number of most frequent terms to list
        #[arg(short = 't', long, default_value = "10")]
        top: usize,
    },
}
