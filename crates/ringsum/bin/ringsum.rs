//! Sums paced records through a ten-slot producer/consumer ring.
//!
//! Reads `value producer_delay_ms consumer_delay_ms log_mode` records from
//! stdin (or `--input`) and prints `Final sum is N` when input runs out.
//!
//! Run with: `cargo run -p ringsum -- -v < records.txt`

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use ringsum::{level_filter, Driver, RunSummary, ThreadSleeper};
use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;

#[derive(Debug, Parser)]
#[command(name = "ringsum")]
#[command(about = "Paced producer/consumer summing over a bounded ring buffer")]
struct Cli {
    /// Read records from this file instead of stdin.
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Diagnostic verbosity on stderr (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<RunSummary> {
    let driver = Driver::new(ThreadSleeper);

    let summary = match &cli.input {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("couldn't open input file {}", path.display()))?;
            driver.run(BufReader::new(file), io::stdout(), io::stdout())?
        }
        None => driver.run(io::stdin().lock(), io::stdout(), io::stdout())?,
    };
    Ok(summary)
}

/// Diagnostics go to stderr; stdout carries only the run's own output.
fn init_tracing(verbosity: u8) {
    let _ = tracing_subscriber::fmt()
        .with_max_level(level_filter(verbosity))
        .with_writer(io::stderr)
        .with_target(false)
        .with_thread_names(true)
        .try_init();
}
