//! Race invariants - sanity checks that detect bugs.
//!
//! None of these can be violated through [`RaceState::apply`]. A violation
//! means a bug in the engine or a hand-built board that was never legal.
//!
//! [`RaceState::apply`]: crate::game::RaceState::apply

use std::collections::{BTreeSet, HashMap};

use crate::game::{Board, Phase, RaceState};

/// Invariant violation error.
#[derive(Debug, Clone)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub message: String,
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invariant violation: {}", self.message)
    }
}

impl std::error::Error for InvariantViolation {}

fn violation(message: String) -> InvariantViolation {
    InvariantViolation { message }
}

/// Check camel and tile placement on a board.
#[must_use]
pub fn check_board(board: &Board) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();

    let mut slots = BTreeSet::new();
    for camel in board.camels() {
        if !slots.insert((camel.position, camel.stack_order)) {
            violations.push(violation(format!(
                "{} shares square {} stack {} with another camel",
                camel.color, camel.position, camel.stack_order
            )));
        }
        if camel.position < 0 || camel.position > board.max_position() {
            violations.push(violation(format!(
                "{} is off the track at {}",
                camel.color, camel.position
            )));
        }
    }

    let mut squares = BTreeSet::new();
    let mut owners = BTreeSet::new();
    for tile in board.tiles() {
        if tile.position <= 0 || tile.position >= board.finish_line() {
            violations.push(violation(format!(
                "tile of player {} on illegal square {}",
                tile.owner, tile.position
            )));
        }
        if !squares.insert(tile.position) {
            violations.push(violation(format!("two tiles on square {}", tile.position)));
        }
        if !owners.insert(tile.owner) {
            violations.push(violation(format!("player {} owns two tiles", tile.owner)));
        }
    }

    violations
}

/// Check all race invariants.
///
/// Returns a list of violations found, or empty if all invariants hold.
#[must_use]
pub fn check_invariants(state: &RaceState) -> Vec<InvariantViolation> {
    let mut violations = check_board(state.board());

    // Dice: remaining and rolled partition the full set.
    let dice = state.dice();
    let mut counts = HashMap::new();
    for die in dice.full() {
        *counts.entry(*die).or_insert(0i32) += 1;
    }
    for die in dice.remaining().iter().chain(dice.rolled()) {
        *counts.entry(*die).or_insert(0i32) -= 1;
    }
    if counts.values().any(|&n| n != 0) {
        violations.push(violation(format!(
            "dice do not add up: full {:?}, remaining {:?}, rolled {:?}",
            dice.full(),
            dice.remaining(),
            dice.rolled()
        )));
    }

    // Ticket stacks are consumed from the top, highest value first.
    let schedule_len = state.config().ticket_values.len();
    for color in state.tickets().colors() {
        let stack = state.tickets().stack(color);
        if stack.windows(2).any(|w| w[0] > w[1]) {
            violations.push(violation(format!("{color} ticket stack out of order: {stack:?}")));
        }
        if state.phase() == Phase::AwaitingAction {
            let held: usize = state
                .players()
                .iter()
                .map(|p| p.tickets.iter().filter(|t| t.camel == color).count())
                .sum();
            if held + stack.len() != schedule_len {
                violations.push(violation(format!(
                    "{color} tickets: {held} held + {} left != {schedule_len}",
                    stack.len()
                )));
            }
        }
    }

    // Partnerships are mutual.
    for player in state.players() {
        if let Some(partner) = player.partner {
            let back = state.player(partner).and_then(|p| p.partner);
            if back != Some(player.id) {
                violations.push(violation(format!(
                    "player {} partners {partner} but not the other way round",
                    player.id
                )));
            }
        }
    }

    // Terminal state and standing agree.
    let over = state.phase() == Phase::RaceComplete;
    if over != state.standing().is_some() {
        violations.push(violation(format!(
            "phase {:?} with standing {:?}",
            state.phase(),
            state.standing()
        )));
    }
    if !over && state.board().has_finished() {
        violations.push(violation("a camel finished but the race goes on".to_string()));
    }

    violations
}

/// Assert all race invariants hold, panicking if any are violated.
///
/// Only active in debug builds. No-op in release builds.
///
/// # Panics
///
/// Panics with detailed message if any invariant is violated.
#[cfg(debug_assertions)]
pub fn assert_invariants(state: &RaceState) {
    let violations = check_invariants(state);
    if !violations.is_empty() {
        let messages: Vec<_> = violations.iter().map(|v| v.message.as_str()).collect();
        panic!("Race invariant violations:\n  - {}", messages.join("\n  - "));
    }
}

/// No-op in release builds.
#[cfg(not(debug_assertions))]
pub fn assert_invariants(_state: &RaceState) {}
