#![no_main]

//! Action sequence fuzzer.
//!
//! Feeds arbitrary actions (legal or not) from arbitrary seats into a race
//! and checks that refused actions leave the state untouched and accepted
//! ones keep every invariant.

use arbitrary::Arbitrary;
use camelrace::game::{check_invariants, ScriptedRandomness, TileKind, WagerKind};
use camelrace::{Action, CamelColor, RaceConfig, RaceState};
use libfuzzer_sys::fuzz_target;

const COLORS: [CamelColor; 7] = [
    CamelColor::Red,
    CamelColor::Blue,
    CamelColor::Green,
    CamelColor::Yellow,
    CamelColor::Purple,
    CamelColor::White,
    CamelColor::Black,
];

/// A fuzzer-generated action.
#[derive(Arbitrary, Debug, Clone, Copy)]
enum FuzzAction {
    Roll,
    Ticket(u8),
    Tile { oasis: bool, position: i8 },
    Wager { winner: bool, camel: u8 },
    Partner(u8),
}

impl FuzzAction {
    fn to_action(self) -> Action {
        let color = |i: u8| COLORS[usize::from(i) % COLORS.len()];
        match self {
            FuzzAction::Roll => Action::Roll,
            FuzzAction::Ticket(c) => Action::TakeTicket(color(c)),
            FuzzAction::Tile { oasis, position } => Action::PlaceTile {
                kind: if oasis { TileKind::Oasis } else { TileKind::Mirage },
                position: i32::from(position),
            },
            FuzzAction::Wager { winner, camel } => Action::FinalWager {
                kind: if winner { WagerKind::Winner } else { WagerKind::Loser },
                camel: color(camel),
            },
            FuzzAction::Partner(p) => Action::Partner(p % 10),
        }
    }
}

/// Structured input for a whole race.
#[derive(Arbitrary, Debug)]
struct RaceInput {
    /// Preset (folded into 0..3).
    preset: u8,
    /// Seats (folded into 2..=8).
    seats: u8,
    /// Die choices consumed by rolls.
    choices: Vec<u8>,
    /// Step counts consumed by rolls.
    steps: Vec<u8>,
    /// (seat, action) pairs.
    actions: Vec<(u8, FuzzAction)>,
}

fuzz_target!(|input: RaceInput| {
    let config = match input.preset % 3 {
        0 => RaceConfig::classic(),
        1 => RaceConfig::crazy(),
        _ => RaceConfig::full(),
    };
    let seats = input.seats % 7 + 2;
    let names: Vec<String> = (1..=seats).map(|i| format!("p{i}")).collect();
    let mut rng = ScriptedRandomness::new(
        input.choices.iter().map(|&c| usize::from(c)),
        input.steps.iter().copied(),
    );

    let Ok(mut state) = RaceState::new(config, names, &mut rng) else {
        return;
    };
    assert!(check_invariants(&state).is_empty());

    for (seat, action) in input.actions.into_iter().take(500) {
        let before = state.clone();
        match state.apply(seat % 10, action.to_action(), &mut rng) {
            Ok(_) => {
                let violations = check_invariants(&state);
                assert!(violations.is_empty(), "after {action:?}: {violations:?}");
            }
            Err(_) => assert_eq!(state, before, "refused {action:?} changed the state"),
        }
    }
});
