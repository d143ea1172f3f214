//! Run command implementation.

use std::path::Path;

use camelrace::bot::PolicyKind;
use camelrace::sim::{run_race, SimConfig};
use camelrace::Variant;
use tracing::info;

use super::output::{format_text, JsonRaceResult};
use super::{load_config, seed_or_clock, CliError, OutputFormat};

/// Execute the run command.
///
/// # Errors
///
/// Returns an error if the config is invalid, the race fails, or the
/// recording cannot be saved.
pub(crate) fn execute(
    bots: &[PolicyKind],
    variant: Variant,
    config: Option<&Path>,
    seed: Option<u64>,
    format: OutputFormat,
    save: Option<&Path>,
) -> Result<(), CliError> {
    let config = load_config(variant, config)?;
    let seed = seed_or_clock(seed);
    info!(seed, players = bots.len(), "starting race");

    let result = run_race(seed, bots, &config, &SimConfig::default())?;

    if let Some(path) = save {
        result.recording.save(path)?;
        info!(path = %path.display(), "recording saved");
    }

    match format {
        OutputFormat::Text => print!("{}", format_text(&result)),
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&JsonRaceResult::from_race_result(&result))?;
            println!("{json}");
        }
    }

    Ok(())
}
