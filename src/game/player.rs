//! Player state management.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::game::CamelColor;

/// Unique identifier for a player, counted from 1.
pub type PlayerId = u8;

/// A betting ticket held for the open leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BettingTicket {
    /// Camel the ticket backs.
    pub camel: CamelColor,
    /// Face value paid if that camel leads the leg.
    pub value: u32,
}

/// State for a single player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Unique identifier for this player.
    pub id: PlayerId,
    /// Display name.
    pub name: String,
    /// Coins. Never negative.
    pub money: u32,
    /// Betting tickets taken this leg.
    pub tickets: Vec<BettingTicket>,
    /// Dice rolled this leg, each worth one coin at settlement.
    pub pyramid_credits: u32,
    /// Whether a desert tile was placed this leg.
    pub placed_tile: bool,
    /// Final-wager cards still in hand, one per racing color until spent.
    pub wager_cards: BTreeSet<CamelColor>,
    /// Partner for the open leg.
    pub partner: Option<PlayerId>,
}

impl Player {
    /// Create a player with a starting stake and a hand of wager cards.
    #[must_use]
    pub fn new(
        id: PlayerId,
        name: impl Into<String>,
        money: u32,
        wager_cards: impl IntoIterator<Item = CamelColor>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            money,
            tickets: Vec::new(),
            pyramid_credits: 0,
            placed_tile: false,
            wager_cards: wager_cards.into_iter().collect(),
            partner: None,
        }
    }

    /// Add (or subtract) coins, clamping the balance at zero.
    pub fn apply_earnings(&mut self, delta: i64) {
        let total = i64::from(self.money).saturating_add(delta).max(0);
        self.money = u32::try_from(total).unwrap_or(u32::MAX);
    }

    /// Forget everything tied to the open leg.
    pub fn clear_leg(&mut self) {
        self.tickets.clear();
        self.pyramid_credits = 0;
        self.placed_tile = false;
        self.partner = None;
    }
}
