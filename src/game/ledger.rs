//! Betting-ticket stacks and the race-long final-wager piles.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::Rejection;
use crate::game::{CamelColor, PlayerId};

/// Per-leg betting-ticket stacks, one per racing camel.
///
/// Each stack hands out the configured face values from highest to lowest and
/// is refilled only by [`TicketLedger::reset_for_new_leg`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketLedger {
    /// Face values per stack, highest first.
    schedule: Vec<u32>,
    /// Remaining values per color, stored lowest first so the top pops off.
    stacks: BTreeMap<CamelColor, Vec<u32>>,
}

impl TicketLedger {
    /// Build full stacks for each color.
    ///
    /// The schedule is sorted highest first, so stack consumption is
    /// monotonic whatever order the values were given in.
    #[must_use]
    pub fn new(colors: &[CamelColor], schedule: &[u32]) -> Self {
        let mut schedule = schedule.to_vec();
        schedule.sort_unstable_by(|a, b| b.cmp(a));
        let mut ledger = Self {
            schedule,
            stacks: BTreeMap::new(),
        };
        for &color in colors {
            ledger.stacks.insert(color, Vec::new());
        }
        ledger.reset_for_new_leg();
        ledger
    }

    /// Take the top ticket for a camel.
    ///
    /// # Errors
    ///
    /// [`Rejection::NoTicketStack`] if the camel has no stack (reversed camels),
    /// [`Rejection::TicketsExhausted`] if its stack is empty.
    pub fn take_ticket(&mut self, color: CamelColor) -> Result<u32, Rejection> {
        let stack = self
            .stacks
            .get_mut(&color)
            .ok_or(Rejection::NoTicketStack(color))?;
        stack.pop().ok_or(Rejection::TicketsExhausted(color))
    }

    /// Value the next ticket for a camel would have.
    #[must_use]
    pub fn peek_next_value(&self, color: CamelColor) -> Option<u32> {
        self.stacks.get(&color).and_then(|s| s.last().copied())
    }

    /// Tickets left for a camel.
    #[must_use]
    pub fn remaining(&self, color: CamelColor) -> usize {
        self.stacks.get(&color).map_or(0, Vec::len)
    }

    /// Values left for a camel, bottom of the stack first.
    #[must_use]
    pub fn stack(&self, color: CamelColor) -> &[u32] {
        self.stacks.get(&color).map_or(&[], Vec::as_slice)
    }

    /// Colors that have a stack.
    pub fn colors(&self) -> impl Iterator<Item = CamelColor> + '_ {
        self.stacks.keys().copied()
    }

    /// Refill every stack.
    pub fn reset_for_new_leg(&mut self) {
        for stack in self.stacks.values_mut() {
            stack.clear();
            stack.extend(self.schedule.iter().rev());
        }
    }
}

/// Which end of the race a final wager backs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WagerKind {
    /// Camel that will win the race.
    Winner,
    /// Camel that will finish last.
    Loser,
}

/// A final-wager card on one of the piles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalWager {
    /// Who placed it.
    pub player: PlayerId,
    /// Camel backed.
    pub camel: CamelColor,
}

/// The two race-long piles of final wagers, in placement order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalWagers {
    winner: Vec<FinalWager>,
    loser: Vec<FinalWager>,
}

impl FinalWagers {
    /// Put a card on a pile.
    pub fn place(&mut self, kind: WagerKind, player: PlayerId, camel: CamelColor) {
        self.pile_mut(kind).push(FinalWager { player, camel });
    }

    /// Cards on a pile, first placed first.
    #[must_use]
    pub fn pile(&self, kind: WagerKind) -> &[FinalWager] {
        match kind {
            WagerKind::Winner => &self.winner,
            WagerKind::Loser => &self.loser,
        }
    }

    fn pile_mut(&mut self, kind: WagerKind) -> &mut Vec<FinalWager> {
        match kind {
            WagerKind::Winner => &mut self.winner,
            WagerKind::Loser => &mut self.loser,
        }
    }
}
