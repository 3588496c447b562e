//! `ast_parser` - dump the entities of C/C++ sources as JSON

#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use ast_analyzer::utils::file_utils::collect_source_files;
use ast_analyzer::{analyze_files, AnalyzerConfig};

#[derive(Parser)]
#[command(name = "ast_parser")]
#[command(about = "Extract functions, calls, variables and references from C/C++ sources")]
struct Cli {
    /// Show version information
    #[arg(short = 'v', long)]
    version: bool,

    /// TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config_path: Option<PathBuf>,

    /// Source file or directory to analyze
    #[arg(short, long, value_name = "PATH", required_unless_present = "version")]
    source: Option<PathBuf>,

    /// Write JSON here instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Verbose logging
    #[arg(short = 'V', long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    if cli.version {
        println!("ast_parser {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }
    init_logging(cli.verbose);

    let Some(source) = cli.source.as_deref() else {
        bail!("--source is required");
    };

    let config = match &cli.config_path {
        Some(path) => AnalyzerConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => AnalyzerConfig::default(),
    };

    if !source.exists() {
        bail!("Source path does not exist: {}", source.display());
    }

    let files = collect_source_files(source);
    debug!("Analyzing {} files", files.len());

    let results = analyze_files(&files, &config);
    let failed = results.iter().filter(|result| !result.is_success()).count();

    let json = serde_json::to_string_pretty(&results).context("Failed to serialize results")?;
    match &cli.output {
        Some(path) => {
            fs::write(path, json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Wrote results for {} files to {}", results.len(), path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{json}").context("Failed to write to stdout")?;
        }
    }

    if failed > 0 {
        bail!("{failed} of {} files failed to parse", results.len());
    }
    Ok(())
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
