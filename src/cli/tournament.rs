//! Tournament command implementation.

use std::path::PathBuf;
use std::time::Instant;

use camelrace::bot::PolicyKind;
use camelrace::sim::{run_race, SimConfig};
use camelrace::Variant;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use tracing::{info, warn};

use super::output::{
    format_tournament_csv, format_tournament_text, JsonTournamentResult, TournamentStats,
};
use super::{load_config, seed_or_clock, CliError, TournamentFormat};

/// Parsed `tournament` arguments.
#[derive(Debug)]
pub(crate) struct TournamentArgs {
    /// Policy per seat.
    pub(crate) bots: Vec<PolicyKind>,
    /// Preset used when no config file is given.
    pub(crate) variant: Variant,
    /// Optional JSON config file.
    pub(crate) config: Option<PathBuf>,
    /// Number of races.
    pub(crate) games: u64,
    /// First seed; race `i` uses `seed + i`.
    pub(crate) seed: Option<u64>,
    /// Worker threads.
    pub(crate) threads: Option<usize>,
    /// Report format.
    pub(crate) format: TournamentFormat,
    /// Show a progress bar.
    pub(crate) progress: bool,
}

/// Execute the tournament command.
///
/// # Errors
///
/// Returns an error if the config is invalid or the report cannot be written.
pub(crate) fn execute(args: &TournamentArgs) -> Result<(), CliError> {
    let config = load_config(args.variant, args.config.as_deref())?;
    let bot_names: Vec<String> = args.bots.iter().map(|b| b.name().to_string()).collect();

    // Set thread pool size if specified
    if let Some(num_threads) = args.threads {
        if let Err(e) = rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
        {
            warn!(%e, "could not resize thread pool");
        }
    }

    let base_seed = seed_or_clock(args.seed);
    info!(base_seed, games = args.games, "starting tournament");

    let pb = if args.progress {
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} races ({per_sec})")
            .map_err(|e| CliError::Other(format!("progress template: {e}")))?
            .progress_chars("=>-");
        let pb = ProgressBar::new(args.games);
        pb.set_style(style);
        Some(pb)
    } else {
        None
    };

    let start = Instant::now();
    let num_players = args.bots.len();
    let sim = SimConfig::default();

    // Each thread folds into its own stats; merged at the end.
    let stats = (0..args.games)
        .into_par_iter()
        .fold(
            || TournamentStats::new(num_players),
            |mut local_stats, i| {
                let race_seed = base_seed.wrapping_add(i);
                match run_race(race_seed, &args.bots, &config, &sim) {
                    Ok(result) => local_stats.add_result(&result),
                    Err(e) => {
                        warn!(race_seed, %e, "race failed");
                        local_stats.add_failure();
                    }
                }
                if let Some(pb) = &pb {
                    pb.inc(1);
                }
                local_stats
            },
        )
        .reduce(
            || TournamentStats::new(num_players),
            |mut a, b| {
                a.merge(&b);
                a
            },
        );

    if let Some(pb) = pb {
        pb.finish_with_message("done");
    }

    let duration = start.elapsed();
    let secs = duration.as_secs_f64();

    match args.format {
        TournamentFormat::Text => {
            println!();
            print!("{}", format_tournament_text(&stats, &bot_names));
            println!();
            #[allow(clippy::cast_precision_loss)]
            let per_sec = if secs > 0.0 { stats.games_played as f64 / secs } else { 0.0 };
            println!("Duration: {secs:.2}s ({per_sec:.0} races/sec)");
        }
        TournamentFormat::Json => {
            let json = serde_json::to_string_pretty(&JsonTournamentResult::from_stats(
                &stats, &bot_names,
            ))?;
            println!("{json}");
        }
        TournamentFormat::Csv => print!("{}", format_tournament_csv(&stats, &bot_names)),
    }

    Ok(())
}
