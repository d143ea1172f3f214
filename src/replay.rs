//! Race replay and viewing system.
//!
//! Because races are deterministic given their seed, replay requires only:
//! - `seed: u64` - feeds the dice and the opening layout
//! - `config` and `players` - to rebuild the starting state
//! - `actions` - every accepted action, in order
//!
//! No state deltas needed. To view action N, re-apply actions 0 to N.
//!
//! # Time Travel
//!
//! - **Forward**: Apply the next recorded action
//! - **Backward**: Re-run from the start to (`step` - 1)
//! - **Jump to step N**: Re-run from the start to N

mod render;
mod text;

pub use render::render_ascii;
pub use text::render_text;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::config::{ConfigError, RaceConfig};
use crate::error::Rejection;
use crate::game::{assert_invariants, Action, Event, PlayerId, RaceState, SeededRandomness};

/// One accepted action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordedAction {
    /// Player who acted.
    pub player: PlayerId,
    /// What they did.
    pub action: Action,
}

/// Everything needed to rebuild a race.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recording {
    /// Seed for the race's dice.
    pub seed: u64,
    /// Race rules.
    pub config: RaceConfig,
    /// Player names, in seating order.
    pub players: Vec<String>,
    /// Accepted actions, in order.
    pub actions: Vec<RecordedAction>,
}

impl Recording {
    /// Empty recording for a race about to start.
    #[must_use]
    pub fn new(seed: u64, config: RaceConfig, players: Vec<String>) -> Self {
        Self {
            seed,
            config,
            players,
            actions: Vec::new(),
        }
    }

    /// Append an accepted action.
    pub fn push(&mut self, player: PlayerId, action: Action) {
        self.actions.push(RecordedAction { player, action });
    }

    /// Number of recorded actions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Whether no action was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Starting state and the dice stream that goes with it.
    ///
    /// # Errors
    ///
    /// Returns an error if the config or player list is invalid.
    pub fn start(&self) -> Result<(RaceState, SeededRandomness), ConfigError> {
        let mut rng = SeededRandomness::new(self.seed);
        let state = RaceState::new(self.config.clone(), self.players.iter().cloned(), &mut rng)?;
        Ok((state, rng))
    }

    /// Save the recording as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn save(&self, path: &Path) -> Result<(), ReplayError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|source| ReplayError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load a JSON recording.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ReplayError> {
        let json = std::fs::read_to_string(path).map_err(|source| ReplayError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_str(&json)?)
    }
}

/// Error type for replay operations.
#[derive(Debug, Error)]
pub enum ReplayError {
    /// Recording file could not be read or written.
    #[error("recording {}: {source}", .path.display())]
    Io {
        /// File involved.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },
    /// Recording is not valid JSON.
    #[error("invalid recording JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// Recorded config or players cannot start a race.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Step number out of bounds.
    #[error("step {requested} out of bounds (recording has {total} actions)")]
    StepOutOfBounds {
        /// Requested step.
        requested: usize,
        /// Number of recorded actions.
        total: usize,
    },
    /// Every recorded action has been applied.
    #[error("end of recording")]
    EndOfRecording,
    /// A recorded action was refused: the recording does not match the engine.
    #[error("recorded action {step} was refused: {rejection}")]
    Diverged {
        /// Index of the refused action.
        step: usize,
        /// Why it was refused.
        rejection: Rejection,
    },
}

/// Replay engine - steps through a recorded race deterministically.
///
/// Since races are deterministic, this engine can:
/// - Step forward by applying one recorded action
/// - Step backward by replaying from the start
/// - Jump to any step by replaying from the start
#[derive(Debug, Clone)]
pub struct ReplayEngine {
    recording: Recording,
    state: RaceState,
    rng: SeededRandomness,
    /// Number of recorded actions applied so far.
    step: usize,
    last_event: Option<Event>,
}

impl ReplayEngine {
    /// Create a replay engine positioned before the first action.
    ///
    /// # Errors
    ///
    /// Returns an error if the recording cannot start a race.
    pub fn new(recording: Recording) -> Result<Self, ReplayError> {
        let (state, rng) = recording.start()?;
        Ok(Self {
            recording,
            state,
            rng,
            step: 0,
            last_event: None,
        })
    }

    /// Create a replay engine positioned after `step` actions.
    ///
    /// # Errors
    ///
    /// Returns an error if the step is out of bounds or the replay diverges.
    pub fn new_at_step(recording: Recording, step: usize) -> Result<Self, ReplayError> {
        let mut engine = Self::new(recording)?;
        engine.seek(step)?;
        Ok(engine)
    }

    /// The recording being replayed.
    #[must_use]
    pub fn recording(&self) -> &Recording {
        &self.recording
    }

    /// Race state after the applied actions.
    #[must_use]
    pub fn state(&self) -> &RaceState {
        &self.state
    }

    /// Number of actions applied.
    #[must_use]
    pub const fn step(&self) -> usize {
        self.step
    }

    /// Total recorded actions.
    #[must_use]
    pub fn total_steps(&self) -> usize {
        self.recording.len()
    }

    /// Event produced by the most recent action.
    #[must_use]
    pub fn last_event(&self) -> Option<&Event> {
        self.last_event.as_ref()
    }

    /// Whether every recorded action has been applied.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.step >= self.recording.len()
    }

    /// Apply the next recorded action.
    ///
    /// # Errors
    ///
    /// Returns [`ReplayError::EndOfRecording`] once all actions are applied, or
    /// [`ReplayError::Diverged`] if the engine refuses a recorded action.
    pub fn step_forward(&mut self) -> Result<&Event, ReplayError> {
        let Some(&RecordedAction { player, action }) = self.recording.actions.get(self.step) else {
            return Err(ReplayError::EndOfRecording);
        };
        let event = self
            .state
            .apply(player, action, &mut self.rng)
            .map_err(|rejection| ReplayError::Diverged {
                step: self.step,
                rejection,
            })?;
        assert_invariants(&self.state);

        match &event {
            Event::LegEnded { settlement, .. } => {
                info!(step = self.step, leg = settlement.leg, "replayed leg end");
            }
            Event::RaceEnded { race, .. } => {
                info!(step = self.step, winner = %race.winner, "replayed race end");
            }
            _ => debug!(step = self.step, player, ?action, "replayed action"),
        }

        self.step += 1;
        Ok(self.last_event.insert(event))
    }

    /// Step back one action by replaying from the start.
    ///
    /// # Errors
    ///
    /// Returns an error if already at the start or the replay diverges.
    pub fn step_back(&mut self) -> Result<(), ReplayError> {
        let target = self
            .step
            .checked_sub(1)
            .ok_or(ReplayError::StepOutOfBounds {
                requested: 0,
                total: self.recording.len(),
            })?;
        self.seek(target)
    }

    /// Position the engine after `target` actions.
    ///
    /// # Errors
    ///
    /// Returns an error if `target` exceeds the recording or the replay
    /// diverges.
    pub fn seek(&mut self, target: usize) -> Result<(), ReplayError> {
        let total = self.recording.len();
        if target > total {
            return Err(ReplayError::StepOutOfBounds {
                requested: target,
                total,
            });
        }
        if target < self.step {
            let (state, rng) = self.recording.start()?;
            self.state = state;
            self.rng = rng;
            self.step = 0;
            self.last_event = None;
        }
        while self.step < target {
            self.step_forward()?;
        }
        Ok(())
    }

    /// Apply every remaining action.
    ///
    /// # Errors
    ///
    /// Returns an error if the replay diverges.
    pub fn run_to_end(&mut self) -> Result<(), ReplayError> {
        self.seek(self.recording.len())
    }
}
