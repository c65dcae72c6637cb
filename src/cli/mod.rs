//! CLI command definitions and handlers

mod compute;
mod init;
mod list;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Parse and validate workers count (1-64)
fn parse_workers(s: &str) -> Result<usize, String> {
    let n: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;
    if n == 0 {
        Err("workers must be at least 1".to_string())
    } else if n > 64 {
        Err("workers cannot exceed 64".to_string())
    } else {
        Ok(n)
    }
}

/// csmetrics - code-switching metrics for language-tagged corpora
#[derive(Parser, Debug)]
#[command(name = "csmetrics")]
#[command(
    version,
    about = "Calculate metrics describing code-switching behavior in language-tagged corpora",
    long_about = "csmetrics reads a sequence of per-token language tags and reports \
integration, switching, span and entropy measures (M-index, I-index, burstiness, \
memory, CMI, ...).\n\n\
Run without a subcommand to compute the default metric bundle:\n  \
csmetrics corpus.tsv",
    args_conflicts_with_subcommands = true,
    after_help = "\
Examples:
  csmetrics corpus.tsv                          Full metric bundle for a one-token-per-line file
  csmetrics -c 1 -H corpus.tsv                  Tags in the second column, skip the header
  csmetrics -f spans,switchpoints corpus.tsv    Tables instead of scalars
  csmetrics -l EN,HI -x NE,UNIV corpus.tsv      Fix the language set and the ignored tags
  csmetrics --layout record --format tsv rows.tsv out.tsv
  csmetrics list                                Show every metric name"
)]
pub struct Cli {
    /// Corpus file (default: stdin)
    pub infile: Option<PathBuf>,

    /// Metrics file (default: stdout)
    pub outfile: Option<PathBuf>,

    /// Metric(s) to compute; repeatable or comma separated (default: metrics)
    #[arg(short = 'f', long = "function", value_delimiter = ',')]
    pub functions: Vec<String>,

    /// Language tags in the corpus, comma separated: -l EN,HI (default: all non-excluded tags)
    #[arg(short = 'l', long = "langs", value_delimiter = ',')]
    pub langs: Vec<String>,

    /// Tags that carry no language signal, comma separated
    #[arg(short = 'x', long = "exclude", value_delimiter = ',')]
    pub exclude: Vec<String>,

    /// Number of languages used by the M-index (default: size of the language set)
    #[arg(short = 'k', long = "num-langs")]
    pub num_langs: Option<usize>,

    /// Delimiter for the input file: a literal, `\t`, tab, comma or space (default: tab)
    #[arg(short = 'd', long)]
    pub delimiter: Option<String>,

    /// Zero-based language column in the input file (default: 0)
    #[arg(short = 'c', long)]
    pub column: Option<usize>,

    /// Skip the first line of the input
    #[arg(short = 'H', long)]
    pub header: bool,

    /// Input layout: column (one token per line) or record (one sequence per line)
    #[arg(long, value_parser = ["column", "record"])]
    pub layout: Option<String>,

    /// Compare tags case-insensitively
    #[arg(long)]
    pub ignore_case: bool,

    /// Switch entropy form: binary (full) or switch_term (switching term only)
    #[arg(long, value_parser = ["binary", "switch_term"])]
    pub switch_entropy: Option<String>,

    /// Output format: text, json, tsv (default: text)
    #[arg(long, value_parser = ["text", "json", "tsv"])]
    pub format: Option<String>,

    /// Decimal places for scalar values
    #[arg(long)]
    pub precision: Option<usize>,

    /// Number of parallel workers (1-64, default: 4)
    #[arg(long, value_parser = parse_workers)]
    pub workers: Option<usize>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, env = "CSMETRICS_LOG_LEVEL", default_value = "warn", value_parser = ["error", "warn", "info", "debug", "trace"])]
    pub log_level: String,

    /// Configuration file (default: csmetrics.toml or .csmetricsrc.json in the working directory)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Print the corpus summary before the metrics
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Show a progress bar on stderr
    #[arg(long)]
    pub progress: bool,

    /// Exit with status 2 if any metric could not be computed
    #[arg(long)]
    pub strict: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write a csmetrics.toml config file with example settings
    Init {
        /// Directory to write the config into
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// List every metric name with a short description
    List,
}

/// Run the CLI with parsed arguments
pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Some(Commands::Init { ref path }) => init::run(path),
        Some(Commands::List) => list::run(),
        None => compute::run(&cli),
    }
}
