//! Race rules for Camelrace.
//!
//! Implements the race engine:
//! - Board with camels, stacks and desert tiles
//! - Movement resolution for a single die
//! - Dice pool and injectable randomness
//! - Betting tickets and final wagers
//! - Leg and race settlement
//! - The turn-by-turn state machine tying it together

mod board;
mod camel;
mod dice;
mod invariants;
mod ledger;
mod movement;
mod player;
mod scoring;
mod state;
mod view;

pub use board::{Board, Tile, TileKind, FINISH_SLACK};
pub use camel::{Camel, CamelColor, Direction};
pub use dice::{
    DicePool, Die, Randomness, Roll, ScriptedRandomness, SeededRandomness, MAX_STEPS, MIN_STEPS,
};
pub use invariants::{assert_invariants, check_board, check_invariants, InvariantViolation};
pub use ledger::{FinalWager, FinalWagers, TicketLedger, WagerKind};
pub use movement::{resolve, Move};
pub use player::{BettingTicket, Player, PlayerId};
pub use scoring::{
    schedule_value, settle_leg, settle_race, ticket_payout, LegPayout, LegSettlement, RacePayout,
    RaceSettlement,
};
pub use state::{
    Action, Event, Phase, RaceState, RollReport, Standing, MAX_PLAYERS, MIN_PLAYERS,
};
pub use view::RaceView;
