//! Config command implementation.

use std::path::Path;

use camelrace::{RaceConfig, Variant};

use super::CliError;

/// Print a preset as JSON, or validate a config file.
///
/// # Errors
///
/// Returns an error if the checked file is unreadable or invalid.
pub(crate) fn execute(variant: Variant, check: Option<&Path>) -> Result<(), CliError> {
    match check {
        Some(path) => {
            let config = RaceConfig::load(path)?;
            println!(
                "{}: ok ({} racing camels, {} dice, finish line {})",
                path.display(),
                config.racing_camels.len(),
                config.dice.len(),
                config.finish_line
            );
        }
        None => println!("{}", RaceConfig::preset(variant).to_json()?),
    }
    Ok(())
}
