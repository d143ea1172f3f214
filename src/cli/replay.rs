//! Replay command implementation.

use std::path::Path;

use camelrace::replay::{render_ascii, render_text, Recording, ReplayEngine, ReplayError};

use super::{CliError, ReplayFormat};

/// Execute the replay command.
///
/// # Errors
///
/// Returns an error if the recording cannot be loaded or replayed.
pub(crate) fn execute(
    recording: &Path,
    step: Option<usize>,
    format: ReplayFormat,
) -> Result<(), CliError> {
    let recording = Recording::load(recording)?;
    let total = recording.len();
    let target = step.unwrap_or(total);
    if target > total {
        return Err(ReplayError::StepOutOfBounds { requested: target, total }.into());
    }
    let mut engine = ReplayEngine::new(recording)?;

    match format {
        ReplayFormat::Events => {
            while engine.step() < target {
                let event = engine.step_forward()?;
                println!("{}", serde_json::to_string(event)?);
            }
        }
        ReplayFormat::Text => {
            engine.seek(target)?;
            println!("Step {}/{}", engine.step(), engine.total_steps());
            print!("{}", render_text(engine.state()));
        }
        ReplayFormat::Ascii => {
            engine.seek(target)?;
            println!("Step {}/{}", engine.step(), engine.total_steps());
            print!("{}", render_ascii(engine.state().board()));
        }
    }

    Ok(())
}
