//! Pluggable bot policies.
//!
//! A policy sees the race through a [`RaceView`] and answers with an
//! [`Action`]. It never touches the state; the runner applies the action.

use std::fmt;
use std::str::FromStr;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::game::{Action, RaceView};

/// Default threshold for [`LeaderBettor`].
pub const DEFAULT_MIN_TICKET: u32 = 3;

/// A decision strategy for one seat.
pub trait Policy {
    /// Short name used in logs and reports.
    fn name(&self) -> &'static str;

    /// Pick an action. Only called on the viewer's turn.
    fn decide(&mut self, view: &RaceView<'_>) -> Action;
}

/// Always rolls.
#[derive(Debug, Clone, Copy, Default)]
pub struct RollOnly;

impl Policy for RollOnly {
    fn name(&self) -> &'static str {
        "roll"
    }

    fn decide(&mut self, _view: &RaceView<'_>) -> Action {
        Action::Roll
    }
}

/// Uniform over the legal actions.
#[derive(Debug, Clone)]
pub struct RandomPolicy {
    rng: ChaCha8Rng,
}

impl RandomPolicy {
    /// Seeded random policy.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl Policy for RandomPolicy {
    fn name(&self) -> &'static str {
        "random"
    }

    fn decide(&mut self, view: &RaceView<'_>) -> Action {
        let actions = view.legal_actions();
        if actions.is_empty() {
            return Action::Roll;
        }
        actions[self.rng.random_range(0..actions.len())]
    }
}

/// Backs the current leader while its ticket is worth enough, else rolls.
#[derive(Debug, Clone, Copy)]
pub struct LeaderBettor {
    /// Smallest ticket value still worth taking.
    pub min_value: u32,
}

impl Default for LeaderBettor {
    fn default() -> Self {
        Self {
            min_value: DEFAULT_MIN_TICKET,
        }
    }
}

impl Policy for LeaderBettor {
    fn name(&self) -> &'static str {
        "leader"
    }

    fn decide(&mut self, view: &RaceView<'_>) -> Action {
        view.leader()
            .filter(|&c| view.next_ticket(c).is_some_and(|v| v >= self.min_value))
            .map_or(Action::Roll, Action::TakeTicket)
    }
}

/// Built-in policies by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicyKind {
    /// [`RollOnly`].
    Roll,
    /// [`RandomPolicy`].
    Random,
    /// [`LeaderBettor`] with the default threshold.
    Leader,
}

impl PolicyKind {
    /// Every built-in policy.
    pub const ALL: [PolicyKind; 3] = [PolicyKind::Roll, PolicyKind::Random, PolicyKind::Leader];

    /// Name as accepted by [`FromStr`].
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            PolicyKind::Roll => "roll",
            PolicyKind::Random => "random",
            PolicyKind::Leader => "leader",
        }
    }

    /// Instantiate the policy. `seed` feeds policies that need randomness.
    #[must_use]
    pub fn build(self, seed: u64) -> Box<dyn Policy> {
        match self {
            PolicyKind::Roll => Box::new(RollOnly),
            PolicyKind::Random => Box::new(RandomPolicy::new(seed)),
            PolicyKind::Leader => Box::new(LeaderBettor::default()),
        }
    }
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Unknown policy name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown policy '{0}' (expected roll, random or leader)")]
pub struct UnknownPolicy(pub String);

impl FromStr for PolicyKind {
    type Err = UnknownPolicy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PolicyKind::ALL
            .into_iter()
            .find(|k| k.name() == s)
            .ok_or_else(|| UnknownPolicy(s.to_string()))
    }
}
