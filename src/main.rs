//! Camelrace CLI - Command-line interface for running and replaying races.

// Allow print in the CLI binary
#![allow(clippy::print_stdout, clippy::print_stderr)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod cli;

use std::path::PathBuf;
use std::process::ExitCode;

use camelrace::bot::PolicyKind;
use camelrace::Variant;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Camelrace - A deterministic camel-racing and betting engine
#[derive(Parser, Debug)]
#[command(name = "camelrace")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a single race between bots
    Run {
        /// Bot policies, one per seat (roll, random, leader)
        #[arg(short, long, value_delimiter = ',', default_value = "leader,random")]
        bots: Vec<PolicyKind>,

        /// Rule preset
        #[arg(long, default_value = "classic")]
        variant: Variant,

        /// JSON config file (overrides --variant)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Random seed (default: random)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,

        /// Save recording to file
        #[arg(long)]
        save: Option<PathBuf>,
    },

    /// Run many seeded races in parallel and aggregate statistics
    Tournament {
        /// Bot policies, one per seat (roll, random, leader)
        #[arg(short, long, value_delimiter = ',', default_value = "leader,random")]
        bots: Vec<PolicyKind>,

        /// Rule preset
        #[arg(long, default_value = "classic")]
        variant: Variant,

        /// JSON config file (overrides --variant)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Number of races to run (default: 1000)
        #[arg(short, long, default_value = "1000")]
        games: u64,

        /// Starting seed (increments for each race)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Parallel threads (default: CPU count)
        #[arg(short = 'j', long)]
        threads: Option<usize>,

        /// Output format: text, json, or csv
        #[arg(short, long, default_value = "text")]
        format: cli::TournamentFormat,

        /// Show progress bar
        #[arg(short, long)]
        progress: bool,
    },

    /// Replay a recorded race
    Replay {
        /// Recording file (JSON)
        #[arg(required = true)]
        recording: PathBuf,

        /// Stop after this many actions (default: all)
        #[arg(long)]
        step: Option<usize>,

        /// Output format: text, ascii, or events
        #[arg(short, long, default_value = "text")]
        format: cli::ReplayFormat,
    },

    /// Print a preset config or check a config file
    Config {
        /// Preset to print
        #[arg(long, default_value = "classic")]
        variant: Variant,

        /// Config file to validate instead of printing a preset
        #[arg(long)]
        check: Option<PathBuf>,
    },
}

/// Install the stderr log subscriber. `RUST_LOG` wins over `default_level`.
fn init_logging(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let args = Args::parse();

    // Per-race logs stay quiet in tournaments unless -v.
    let default_level = match (&args.command, args.verbose) {
        (_, true) => "debug",
        (Commands::Tournament { .. }, false) => "warn",
        _ => "info",
    };
    init_logging(default_level);

    let result = match args.command {
        Commands::Run {
            bots,
            variant,
            config,
            seed,
            format,
            save,
        } => cli::run::execute(&bots, variant, config.as_deref(), seed, format, save.as_deref()),

        Commands::Tournament {
            bots,
            variant,
            config,
            games,
            seed,
            threads,
            format,
            progress,
        } => cli::tournament::execute(&cli::tournament::TournamentArgs {
            bots,
            variant,
            config,
            games,
            seed,
            threads,
            format,
            progress,
        }),

        Commands::Replay {
            recording,
            step,
            format,
        } => cli::replay::execute(&recording, step, format),

        Commands::Config { variant, check } => cli::config::execute(variant, check.as_deref()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
