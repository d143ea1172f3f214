//! CLI command implementations for Camelrace.

pub(crate) mod config;
pub(crate) mod replay;
pub(crate) mod run;
pub(crate) mod tournament;

mod output;

use std::path::Path;

use camelrace::config::ConfigError;
use camelrace::replay::ReplayError;
use camelrace::sim::SimError;
use camelrace::{RaceConfig, Variant};
use clap::ValueEnum;
use thiserror::Error;

/// Output format for the `run` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Output format for the `replay` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum ReplayFormat {
    /// Structured plain-text race state.
    Text,
    /// Colored track drawing.
    Ascii,
    /// One JSON event per line.
    Events,
}

/// Output format for the `tournament` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum TournamentFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON output.
    Json,
    /// CSV format.
    Csv,
}

/// CLI error type.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    /// Config could not be loaded or is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// A race failed to run.
    #[error(transparent)]
    Sim(#[from] SimError),
    /// A recording could not be loaded or replayed.
    #[error(transparent)]
    Replay(#[from] ReplayError),
    /// Output could not be serialized.
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
    /// Any other failure.
    #[error("{0}")]
    Other(String),
}

/// Load `path` if given, otherwise the preset for `variant`.
fn load_config(variant: Variant, path: Option<&Path>) -> Result<RaceConfig, CliError> {
    match path {
        Some(path) => Ok(RaceConfig::load(path)?),
        None => Ok(RaceConfig::preset(variant)),
    }
}

/// Seed from the clock when none is given.
fn seed_or_clock(seed: Option<u64>) -> u64 {
    seed.unwrap_or_else(|| {
        use std::time::{SystemTime, UNIX_EPOCH};
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .ok()
            .and_then(|d| u64::try_from(d.as_nanos() % u128::from(u64::MAX)).ok())
            .unwrap_or(42)
    })
}
