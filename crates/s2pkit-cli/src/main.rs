//! s2pkit command-line front end
//!
//! Thin presentation layer over the core batch runner: parses arguments,
//! runs one batch, and renders the per-file outcomes.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use s2pkit_core::batch::{BatchSummary, OutcomeKind, TransformKind};
use s2pkit_core::run_batch;

#[derive(Parser)]
#[command(name = "s2pkit", version, about = "Batch transforms for Touchstone .sNp files")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Apply a uniform gain (positive dB) or loss (negative dB) to each file
    Gain {
        /// Gain/loss value in dB, e.g. 5.0 for gain or -0.2 for loss
        #[arg(long = "db", allow_hyphen_values = true)]
        gain_db: f64,

        /// Input .sNp files
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Flip port 1 and port 2 of each 2-port file
    Flip {
        /// Input .s2p files
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose {
            tracing_subscriber::filter::LevelFilter::DEBUG
        } else {
            tracing_subscriber::filter::LevelFilter::WARN
        })
        .init();

    let summary = match cli.command {
        Command::Gain { gain_db, files } => run_batch(&files, TransformKind::Scale { gain_db })?,
        Command::Flip { files } => run_batch(&files, TransformKind::Flip)?,
    };

    render(&summary);

    if summary.failed() > 0 {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

fn render(summary: &BatchSummary) {
    for outcome in &summary.outcomes {
        match &outcome.kind {
            OutcomeKind::Success { output } => {
                println!("ok      {} -> {}", outcome.input.display(), output.display())
            }
            OutcomeKind::Skipped { reason } => {
                println!("skipped {}: {}", outcome.input.display(), reason)
            }
            OutcomeKind::Failed { reason } => {
                println!("FAILED  {}: {}", outcome.input.display(), reason)
            }
        }
    }
    println!(
        "{} processed, {} skipped, {} failed",
        summary.succeeded(),
        summary.skipped(),
        summary.failed()
    );
}
