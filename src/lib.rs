// Allow unwrap and unreadable literals in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::unreadable_literal))]
//! Camelrace: a deterministic camel-racing and betting engine.
//!
//! This crate provides the rules engine for a stacking camel race with
//! per-leg betting, designed for:
//! - Bit-exact deterministic races from a seed
//! - Pluggable bot policies driven through a read-only view
//! - Replay of any race from its recorded actions
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │   Race Runner / Replay / CLI        │
//! ├─────────────────────────────────────┤
//! │   Race State Machine + Scoring      │
//! ├─────────────────────────────────────┤
//! │   Board, Movement, Dice, Ledger     │
//! └─────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use camelrace::{Action, Event, RaceConfig, RaceState, SeededRandomness};
//!
//! let mut rng = SeededRandomness::new(42);
//! let mut race = RaceState::new(RaceConfig::classic(), ["alice", "bob"], &mut rng).unwrap();
//! let event = race.apply(1, Action::Roll, &mut rng).unwrap();
//! assert!(matches!(event, Event::Moved(_)));
//! ```

pub mod bot;
pub mod config;
pub mod error;
pub mod game;
pub mod replay;
pub mod sim;

pub use config::{ConfigError, RaceConfig, StartLayout, Variant};
pub use error::{Rejection, RejectionKind};

// Re-export key game types at crate root for convenience
pub use game::{
    Action, Board, Camel, CamelColor, Event, Player, PlayerId, RaceState, RaceView, Randomness,
    ScriptedRandomness, SeededRandomness, Tile, TileKind, WagerKind,
};
