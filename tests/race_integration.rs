//! Whole-race integration tests.
//!
//! These tests drive complete races through the public API, check the
//! engine's invariants after every accepted action, and replay saved
//! recordings from disk.
//!
//! Run with: cargo test --release race_integration

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::cast_possible_truncation)]

use camelrace::bot::{Policy, PolicyKind, RandomPolicy};
use camelrace::game::{check_invariants, Camel, Die, Event, ScriptedRandomness};
use camelrace::replay::{Recording, ReplayEngine};
use camelrace::sim::{run_race, SimConfig};
use camelrace::{Action, Board, CamelColor, RaceConfig, RaceState, SeededRandomness, Variant};

fn presets() -> [RaceConfig; 3] {
    [RaceConfig::classic(), RaceConfig::crazy(), RaceConfig::full()]
}

/// Play a race with random legal actions, checking invariants as it goes.
fn play_checked(config: RaceConfig, seats: usize, seed: u64) -> RaceState {
    let names: Vec<String> = (1..=seats).map(|i| format!("p{i}")).collect();
    let mut rng = SeededRandomness::new(seed);
    let mut state = RaceState::new(config, names, &mut rng).unwrap();
    let mut policy = RandomPolicy::new(seed);

    for _ in 0..10_000 {
        if state.is_over() {
            break;
        }
        let player = state.current_player();
        let action = policy.decide(&state.view(player));
        state
            .apply(player, action, &mut rng)
            .unwrap_or_else(|r| panic!("legal action {action:?} refused: {r}"));
        let violations = check_invariants(&state);
        assert!(violations.is_empty(), "seed {seed}: {violations:?}");
    }
    state
}

#[test]
fn test_every_preset_finishes_cleanly() {
    for config in presets() {
        for seed in 0..20 {
            let state = play_checked(config.clone(), 2 + (seed as usize % 7), seed);
            assert!(state.is_over(), "seed {seed} did not finish");
            let standing = state.standing().unwrap();
            assert!(standing.winner.is_racing());
            assert_ne!(standing.winner, standing.loser);
            let winner = state.board().camel(standing.winner).unwrap();
            assert!(winner.position >= state.board().finish_line());
        }
    }
}

#[test]
fn test_bot_mix_across_presets() {
    let kinds = [PolicyKind::Leader, PolicyKind::Random, PolicyKind::Roll, PolicyKind::Random];
    for config in presets() {
        for seed in 100..110 {
            let result = run_race(seed, &kinds, &config, &SimConfig::default()).unwrap();
            assert_eq!(result.balances.len(), 4);
            assert!(!result.winners.is_empty());
            let best = result.balances.iter().max().copied().unwrap();
            for &w in &result.winners {
                assert_eq!(result.balances[usize::from(w) - 1], best);
            }
        }
    }
}

/// Ticket on the leader (5) and a ticket on an unplaced camel: 5 - 1 = 4.
#[test]
fn test_leg_settlement_scenario() {
    let board = Board::new(
        16,
        vec![
            Camel::new(CamelColor::Red, 0, 0),
            Camel::new(CamelColor::Blue, 1, 0),
            Camel::new(CamelColor::Green, 10, 0),
            Camel::new(CamelColor::Yellow, 9, 0),
            Camel::new(CamelColor::Purple, 3, 0),
        ],
    );
    let mut state = RaceState::with_board(RaceConfig::classic(), ["alice", "bob"], board).unwrap();
    // Always the first remaining die, one step each.
    let mut rng = ScriptedRandomness::new([], [1; 5]);

    state.apply(1, Action::TakeTicket(CamelColor::Green), &mut rng).unwrap();
    state.apply(2, Action::Roll, &mut rng).unwrap();
    state.apply(1, Action::TakeTicket(CamelColor::Purple), &mut rng).unwrap();
    state.apply(2, Action::Roll, &mut rng).unwrap();
    state.apply(1, Action::Roll, &mut rng).unwrap();
    state.apply(2, Action::Roll, &mut rng).unwrap();
    let event = state.apply(1, Action::Roll, &mut rng).unwrap();

    let Event::LegEnded { settlement, .. } = event else {
        panic!("expected leg end, got {event:?}");
    };
    assert_eq!(settlement.first, Some(CamelColor::Green));
    assert_eq!(settlement.second, Some(CamelColor::Yellow));
    let alice = &settlement.payouts[0];
    assert_eq!(alice.tickets, 4);
    assert_eq!(alice.pyramid, 2);
    assert_eq!(alice.balance, 3 + 4 + 2);
    assert_eq!(settlement.payouts[1].balance, 3 + 3);
    assert_eq!(state.leg(), 2);
}

/// A camel crossing mid-leg ends the race with dice still in the pyramid.
#[test]
fn test_finish_mid_leg_scenario() {
    let mut config = RaceConfig::classic();
    config.racing_camels = vec![CamelColor::Red, CamelColor::Blue, CamelColor::Green];
    config.dice = config.racing_camels.iter().copied().map(Die::Camel).collect();
    let board = Board::new(
        16,
        vec![
            Camel::new(CamelColor::Red, 4, 0),
            Camel::new(CamelColor::Blue, 5, 0),
            Camel::new(CamelColor::Green, 13, 0),
        ],
    );
    let mut state = RaceState::with_board(config, ["a", "b"], board).unwrap();
    // Red moves 1, then green (index 1 of blue, green) moves 3 over the line.
    let mut rng = ScriptedRandomness::new([0, 1], [1, 3]);

    state.apply(1, Action::Roll, &mut rng).unwrap();
    let event = state.apply(2, Action::Roll, &mut rng).unwrap();

    let Event::RaceEnded { race, leg, .. } = event else {
        panic!("expected race end, got {event:?}");
    };
    assert_eq!(race.winner, CamelColor::Green);
    // Red landed on blue, so blue is last.
    assert_eq!(race.loser, CamelColor::Blue);
    assert_eq!(leg.leg, 1);
    assert_eq!(state.dice().remaining(), &[Die::Camel(CamelColor::Blue)]);
    assert_eq!(state.leg(), 1);
    assert!(check_invariants(&state).is_empty());
}

#[test]
fn test_recording_roundtrip_through_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("race.json");

    let kinds = [PolicyKind::Random, PolicyKind::Leader, PolicyKind::Random];
    let result = run_race(77, &kinds, &RaceConfig::full(), &SimConfig::default()).unwrap();
    result.recording.save(&path).unwrap();

    let loaded = Recording::load(&path).unwrap();
    assert_eq!(loaded, result.recording);

    let mut engine = ReplayEngine::new(loaded).unwrap();
    engine.run_to_end().unwrap();
    assert!(engine.state().is_over());
    assert_eq!(engine.state().standing(), Some(result.standing));
    let balances: Vec<u32> = engine.state().players().iter().map(|p| p.money).collect();
    assert_eq!(balances, result.balances);

    // Mid-race seeks agree with a fresh replay.
    let half = engine.total_steps() / 2;
    engine.seek(half).unwrap();
    let fresh = ReplayEngine::new_at_step(result.recording.clone(), half).unwrap();
    assert_eq!(engine.state(), fresh.state());
}

#[test]
fn test_config_file_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("crazy.json");
    let config = RaceConfig::preset(Variant::Crazy);
    std::fs::write(&path, config.to_json().unwrap()).unwrap();
    assert_eq!(RaceConfig::load(&path).unwrap(), config);

    let bad = dir.path().join("bad.json");
    std::fs::write(&bad, r#"{"dice": ["wildcard"], "reversed_camels": []}"#).unwrap();
    assert!(RaceConfig::load(&bad).is_err());
}
