//! Lanecrystal CLI - play, simulate and batch-run lane battles.

// Allow unwrap in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
// Allow print in the CLI binary
#![allow(clippy::print_stdout, clippy::print_stderr)]

mod cli;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

/// Lanecrystal - a deterministic three-lane tap battle
#[derive(Parser, Debug)]
#[command(name = "lanecrystal")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// More log output (-v debug, -vv trace). `LANECRYSTAL_LOG` overrides.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Play against the AI in the terminal
    Play {
        /// Match config file (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Random seed (default: random)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Progression file (default: in-memory only)
        #[arg(long)]
        progress: Option<PathBuf>,

        /// Write logs to this file (the TUI owns the terminal)
        #[arg(long)]
        log_file: Option<PathBuf>,
    },

    /// Run one autopilot match headless
    Sim {
        /// Match config file (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Random seed (default: random)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Give up after this many simulated seconds
        #[arg(long, default_value = "300")]
        max_seconds: f32,

        /// Print the board every N simulated seconds (0: never)
        #[arg(long, default_value = "0")]
        frames: f32,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::SimFormat,
    },

    /// Run many autopilot matches in parallel and aggregate results
    Batch {
        /// Match config file (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Number of matches (default: 100)
        #[arg(short, long, default_value = "100")]
        games: u64,

        /// Starting seed (increments for each match)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Parallel threads (default: CPU count)
        #[arg(short = 'j', long)]
        threads: Option<usize>,

        /// Give up on a match after this many simulated seconds
        #[arg(long, default_value = "300")]
        max_seconds: f32,

        /// Output format: text, json, or csv
        #[arg(short, long, default_value = "text")]
        format: cli::BatchFormat,

        /// Show progress bar
        #[arg(short, long)]
        progress: bool,
    },
}

fn main() -> ExitCode {
    let args = Args::parse();

    let result = match args.command {
        Commands::Play {
            config,
            seed,
            progress,
            log_file,
        } => cli::init_logging(args.verbose, cli::LogTarget::for_tui(log_file))
            .and_then(|()| cli::play::execute(config, seed, progress)),

        Commands::Sim {
            config,
            seed,
            max_seconds,
            frames,
            format,
        } => cli::init_logging(args.verbose, cli::LogTarget::Stderr)
            .and_then(|()| cli::sim::execute(config, seed, max_seconds, frames, format)),

        Commands::Batch {
            config,
            games,
            seed,
            threads,
            max_seconds,
            format,
            progress,
        } => cli::init_logging(args.verbose, cli::LogTarget::Stderr).and_then(|()| {
            cli::batch::execute(config, games, seed, threads, max_seconds, format, progress)
        }),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
