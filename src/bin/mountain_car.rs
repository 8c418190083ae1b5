//! Mountain Car trainer - Sarsa with tile-coded linear value functions
//!
//! Runs a number of independent trials, averages the per-episode returns and
//! step counts across trials, and writes one line per episode to the output
//! file.

use anyhow::Result;
use clap::Parser;
use mountain_car::cli::commands::train::{TrainArgs, execute};
use tracing::Level;

fn main() -> Result<()> {
    let args = TrainArgs::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if args.verbose {
            Level::DEBUG
        } else {
            Level::INFO
        })
        .init();

    execute(args)
}
