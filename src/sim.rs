//! Race runner for bot-driven races.
//!
//! Provides a pure function interface: `(seed, policies, config) -> RaceResult`
//!
//! The runner handles:
//! - Seeding the dice and every random policy from one seed
//! - Asking the seated policy for an action each turn
//! - Falling back to a roll when a policy picks a refused action
//! - Recording accepted actions so the race can be replayed

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::bot::{Policy, PolicyKind};
use crate::config::{ConfigError, RaceConfig};
use crate::error::Rejection;
use crate::game::{
    assert_invariants, Action, Event, PlayerId, RaceState, SeededRandomness, Standing,
};
use crate::replay::Recording;

/// Default cap on actions per race.
pub const DEFAULT_MAX_ACTIONS: u32 = 10_000;

/// Runner settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimConfig {
    /// Give up on a race after this many accepted actions.
    pub max_actions: u32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            max_actions: DEFAULT_MAX_ACTIONS,
        }
    }
}

/// Final result of a race.
#[derive(Debug, Clone, Serialize)]
pub struct RaceResult {
    /// The seed used for this race.
    pub seed: u64,
    /// Policy name per seat.
    pub policies: Vec<String>,
    /// Winning and losing camel.
    pub standing: Standing,
    /// Final balance per seat.
    pub balances: Vec<u32>,
    /// Seats with the highest balance (several on a tie).
    pub winners: Vec<PlayerId>,
    /// Legs played, including the interrupted final leg.
    pub legs: u32,
    /// Accepted actions.
    pub actions: u32,
    /// Policy choices the engine refused.
    pub refused: u32,
    /// Replayable record of the race.
    #[serde(skip)]
    pub recording: Recording,
}

/// Error type for race runs.
#[derive(Debug, Error)]
pub enum SimError {
    /// The race could not be set up.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Both the policy's choice and the fallback roll were refused.
    #[error("player {player} could not act: {rejection}")]
    Stuck {
        /// Seat that could not act.
        player: PlayerId,
        /// Why the fallback roll was refused.
        rejection: Rejection,
    },
    /// The race did not finish within the action cap.
    #[error("race did not finish within {0} actions")]
    ActionLimit(u32),
}

/// Run a race between built-in policies.
///
/// Seat `i` plays `kinds[i]`. Same seed, same race.
///
/// # Errors
///
/// Returns an error if the race cannot be set up or does not finish.
pub fn run_race(
    seed: u64,
    kinds: &[PolicyKind],
    config: &RaceConfig,
    sim: &SimConfig,
) -> Result<RaceResult, SimError> {
    let policies = kinds
        .iter()
        .zip(0u64..)
        .map(|(kind, seat)| kind.build(policy_seed(seed, seat)))
        .collect();
    RaceRunner::new(seed, policies, config.clone())?.run(sim)
}

/// Run a race with caller-supplied policies.
///
/// # Errors
///
/// Returns an error if the race cannot be set up or does not finish.
pub fn run_race_with(
    seed: u64,
    policies: Vec<Box<dyn Policy>>,
    config: &RaceConfig,
    sim: &SimConfig,
) -> Result<RaceResult, SimError> {
    RaceRunner::new(seed, policies, config.clone())?.run(sim)
}

/// Seed for the policy in `seat`, kept apart from the dice stream.
fn policy_seed(seed: u64, seat: u64) -> u64 {
    seed ^ (seat + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

/// Drives one race to completion.
struct RaceRunner {
    state: RaceState,
    rng: SeededRandomness,
    policies: Vec<Box<dyn Policy>>,
    recording: Recording,
    seed: u64,
    refused: u32,
}

impl RaceRunner {
    fn new(seed: u64, policies: Vec<Box<dyn Policy>>, config: RaceConfig) -> Result<Self, SimError> {
        let names: Vec<String> = policies
            .iter()
            .zip(1..)
            .map(|(p, seat)| format!("{}-{seat}", p.name()))
            .collect();
        let recording = Recording::new(seed, config, names);
        let (state, rng) = recording.start()?;
        Ok(Self {
            state,
            rng,
            policies,
            recording,
            seed,
            refused: 0,
        })
    }

    fn run(mut self, sim: &SimConfig) -> Result<RaceResult, SimError> {
        loop {
            if let Some(standing) = self.state.standing() {
                return Ok(self.build_result(standing));
            }
            if self.recording.len() >= sim.max_actions as usize {
                return Err(SimError::ActionLimit(sim.max_actions));
            }
            self.step()?;
        }
    }

    /// Let the current seat act once.
    fn step(&mut self) -> Result<(), SimError> {
        let player = self.state.current_player();
        let seat = usize::from(player) - 1;
        let choice = self.policies[seat].decide(&self.state.view(player));

        let (action, event) = match self.state.apply(player, choice, &mut self.rng) {
            Ok(event) => (choice, event),
            Err(rejection) => {
                self.refused += 1;
                debug!(player, ?choice, %rejection, "policy action refused, rolling instead");
                let event = self
                    .state
                    .apply(player, Action::Roll, &mut self.rng)
                    .map_err(|rejection| SimError::Stuck { player, rejection })?;
                (Action::Roll, event)
            }
        };

        assert_invariants(&self.state);
        self.recording.push(player, action);
        log_event(&event);
        Ok(())
    }

    fn build_result(self, standing: Standing) -> RaceResult {
        let balances: Vec<u32> = self.state.players().iter().map(|p| p.money).collect();
        let best = balances.iter().copied().max().unwrap_or(0);
        let winners = self
            .state
            .players()
            .iter()
            .filter(|p| p.money == best)
            .map(|p| p.id)
            .collect();

        RaceResult {
            seed: self.seed,
            policies: self.policies.iter().map(|p| p.name().to_string()).collect(),
            standing,
            balances,
            winners,
            legs: self.state.leg(),
            actions: u32::try_from(self.recording.len()).unwrap_or(u32::MAX),
            refused: self.refused,
            recording: self.recording,
        }
    }
}

fn log_event(event: &Event) {
    match event {
        Event::Moved(report) => debug!(
            player = report.player,
            camel = %report.roll.camel,
            steps = report.roll.steps,
            from = report.from,
            to = report.to,
            "camel moved"
        ),
        Event::LegEnded { roll, settlement } => {
            debug!(player = roll.player, camel = %roll.roll.camel, to = roll.to, "last die of the leg");
            info!(
                leg = settlement.leg,
                first = ?settlement.first,
                second = ?settlement.second,
                "leg settled"
            );
        }
        Event::RaceEnded { roll, race, .. } => {
            info!(
                player = roll.player,
                winner = %race.winner,
                loser = %race.loser,
                "race finished"
            );
        }
        Event::TicketTaken { player, ticket } => {
            debug!(player, camel = %ticket.camel, value = ticket.value, "ticket taken");
        }
        Event::TilePlaced { tile, payout, .. } => {
            debug!(
                player = tile.owner,
                position = tile.position,
                kind = ?tile.kind,
                payout,
                "tile placed"
            );
        }
        Event::WagerPlaced { player, kind, .. } => {
            debug!(player, ?kind, "final wager placed");
        }
        Event::PartnershipFormed { player, partner } => {
            debug!(player, partner, "partnership formed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bot::RollOnly;

    #[test]
    fn test_same_seed_same_race() {
        let kinds = [PolicyKind::Random, PolicyKind::Leader, PolicyKind::Roll];
        let config = RaceConfig::full();
        let a = run_race(7, &kinds, &config, &SimConfig::default()).unwrap();
        let b = run_race(7, &kinds, &config, &SimConfig::default()).unwrap();
        assert_eq!(a.balances, b.balances);
        assert_eq!(a.standing, b.standing);
        assert_eq!(a.recording, b.recording);
    }

    #[test]
    fn test_roll_only_race_finishes() {
        let result = run_race(
            3,
            &[PolicyKind::Roll, PolicyKind::Roll],
            &RaceConfig::classic(),
            &SimConfig::default(),
        )
        .unwrap();
        assert_eq!(result.refused, 0);
        assert!(result.legs >= 1);
        assert_eq!(result.policies, vec!["roll", "roll"]);
        assert!(!result.winners.is_empty());
        assert_eq!(result.recording.len(), result.actions as usize);
    }

    #[test]
    fn test_every_preset_keeps_invariants() {
        let kinds = [PolicyKind::Random, PolicyKind::Random, PolicyKind::Leader];
        for config in [RaceConfig::classic(), RaceConfig::crazy(), RaceConfig::full()] {
            for seed in 0..5 {
                // Debug builds assert the invariants after every accepted action.
                let result = run_race(seed, &kinds, &config, &SimConfig::default()).unwrap();
                let (mut state, mut rng) = result.recording.start().unwrap();
                for recorded in &result.recording.actions {
                    state.apply(recorded.player, recorded.action, &mut rng).unwrap();
                    assert!(crate::game::check_invariants(&state).is_empty());
                }
            }
        }
    }

    #[test]
    fn test_too_few_players() {
        let err = run_race(1, &[PolicyKind::Roll], &RaceConfig::classic(), &SimConfig::default())
            .unwrap_err();
        assert!(matches!(err, SimError::Config(ConfigError::PlayerCount(1))));
    }

    #[test]
    fn test_action_limit() {
        let err = run_race(
            1,
            &[PolicyKind::Roll, PolicyKind::Roll],
            &RaceConfig::classic(),
            &SimConfig { max_actions: 2 },
        )
        .unwrap_err();
        assert!(matches!(err, SimError::ActionLimit(2)));
    }

    /// Always asks for a ticket on a camel that is not in the race.
    struct Stubborn;

    impl Policy for Stubborn {
        fn name(&self) -> &'static str {
            "stubborn"
        }

        fn decide(&mut self, _view: &crate::game::RaceView<'_>) -> Action {
            Action::TakeTicket(crate::game::CamelColor::White)
        }
    }

    #[test]
    fn test_refused_choice_falls_back_to_roll() {
        let policies: Vec<Box<dyn Policy>> = vec![Box::new(Stubborn), Box::new(RollOnly)];
        let result = run_race_with(5, policies, &RaceConfig::classic(), &SimConfig::default()).unwrap();
        assert!(result.refused > 0);
        assert!(result
            .recording
            .actions
            .iter()
            .all(|a| a.action == Action::Roll));
    }
}
