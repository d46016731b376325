use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use gstree::index::stats::show_stats;
use gstree::index::{CorpusConfig, build_corpus};
use gstree::output;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;
use termcolor::ColorChoice;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "gstree")]
#[command(about = "Exact substring search over lines of text, backed by a generalized suffix tree")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print lines containing PATTERN
    Search {
        /// Literal substring to look for
        pattern: String,

        /// Files or directories to index
        #[arg(default_value = ".")]
        paths: Vec<PathBuf>,

        #[command(flatten)]
        corpus: CorpusArgs,

        /// Only print the paths of files with at least one match
        #[arg(short = 'l', long)]
        files_with_matches: bool,

        /// Only print the number of matching lines per file
        #[arg(short, long)]
        count: bool,

        /// Print matches as JSON
        #[arg(long)]
        json: bool,

        /// Group matches under the file name
        #[arg(long)]
        heading: bool,

        /// When to use colors
        #[arg(long, value_enum, default_value_t = ColorMode::Auto)]
        color: ColorMode,

        /// Stop after this many matching lines
        #[arg(short = 'm', long)]
        max_count: Option<usize>,
    },
    /// Index the given paths and show tree statistics
    Stats {
        /// Files or directories to index
        #[arg(default_value = ".")]
        paths: Vec<PathBuf>,

        #[command(flatten)]
        corpus: CorpusArgs,

        /// Print statistics as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args)]
struct CorpusArgs {
    /// Match case-insensitively (ASCII)
    #[arg(short = 'i', long)]
    ignore_case: bool,

    /// Only index files matching this glob (repeatable)
    #[arg(short = 'g', long = "glob")]
    globs: Vec<String>,

    /// Index hidden files and directories
    #[arg(long)]
    hidden: bool,

    /// JSON file with corpus options; flags override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Never show a progress bar
    #[arg(long)]
    no_progress: bool,
}

impl CorpusArgs {
    fn resolve(&self) -> Result<CorpusConfig> {
        let mut config = match &self.config {
            Some(path) => CorpusConfig::load(path)?,
            None => CorpusConfig::default(),
        };
        if self.ignore_case {
            config.case_insensitive = true;
        }
        if self.hidden {
            config.hidden = true;
        }
        if !self.globs.is_empty() {
            config.globs = self.globs.clone();
        }
        Ok(config)
    }

    fn show_progress(&self, json: bool) -> bool {
        !self.no_progress && !json && std::io::stderr().is_terminal()
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum ColorMode {
    Auto,
    Always,
    Never,
}

impl ColorMode {
    fn choice(self) -> ColorChoice {
        match self {
            ColorMode::Auto if std::io::stdout().is_terminal() => ColorChoice::Auto,
            ColorMode::Auto | ColorMode::Never => ColorChoice::Never,
            ColorMode::Always => ColorChoice::Always,
        }
    }
}

fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();

    // ripgrep convention: 0 on match, 1 on no match, 2 on error
    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("gstree: {:#}", e);
            ExitCode::from(2)
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("GSTREE_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<bool> {
    match cli.command {
        Commands::Search {
            pattern,
            paths,
            corpus,
            files_with_matches,
            count,
            json,
            heading,
            color,
            max_count,
        } => {
            let config = corpus.resolve()?;
            let indexed = build_corpus(&paths, &config, corpus.show_progress(json))?;

            let mut hits = indexed.search(&pattern);
            if let Some(max) = max_count {
                hits.truncate(max);
            }

            let choice = color.choice();
            if json {
                output::print_json(&hits)?;
            } else if files_with_matches {
                output::print_files_only(&hits, choice)?;
            } else if count {
                output::print_match_counts(&hits, choice)?;
            } else {
                output::print_hits(&hits, choice, heading)?;
            }

            Ok(!hits.is_empty())
        }
        Commands::Stats {
            paths,
            corpus,
            json,
        } => {
            let config = corpus.resolve()?;
            let indexed = build_corpus(&paths, &config, corpus.show_progress(json))?;
            let stats = indexed.tree.stats();

            if json {
                output::print_stats_json(
                    indexed.file_count,
                    indexed.records.len(),
                    indexed.skipped_files,
                    indexed.skipped_lines,
                    &stats,
                )?;
            } else {
                println!("Files:            {}", indexed.file_count);
                println!("Lines:            {}", indexed.records.len());
                println!("Skipped files:    {}", indexed.skipped_files);
                println!("Skipped lines:    {}", indexed.skipped_lines);
                println!();
                show_stats(&stats);
            }

            Ok(true)
        }
    }
}
