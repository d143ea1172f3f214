//! Read-only projection of a race for one player.
//!
//! Bots decide from a [`RaceView`]; it hands out shared references only, so a
//! policy cannot change the race behind the engine's back.

use crate::config::RaceConfig;
use crate::game::{
    Action, Board, CamelColor, Die, Player, PlayerId, RaceState, TileKind, WagerKind,
};

/// What one player can see and do.
#[derive(Debug, Clone, Copy)]
pub struct RaceView<'a> {
    state: &'a RaceState,
    player: PlayerId,
}

impl<'a> RaceView<'a> {
    pub(crate) const fn new(state: &'a RaceState, player: PlayerId) -> Self {
        Self { state, player }
    }

    /// The viewing player.
    #[must_use]
    pub const fn player_id(&self) -> PlayerId {
        self.player
    }

    /// The viewing player's record.
    #[must_use]
    pub fn me(&self) -> Option<&'a Player> {
        self.state.player(self.player)
    }

    /// Whether the viewer is the one to act.
    #[must_use]
    pub fn is_my_turn(&self) -> bool {
        !self.state.is_over() && self.state.current_player() == self.player
    }

    /// Camels and tiles.
    #[must_use]
    pub fn board(&self) -> &'a Board {
        self.state.board()
    }

    /// Every player, in seating order.
    #[must_use]
    pub fn players(&self) -> &'a [Player] {
        self.state.players()
    }

    /// Race rules.
    #[must_use]
    pub fn config(&self) -> &'a RaceConfig {
        self.state.config()
    }

    /// Current leg.
    #[must_use]
    pub fn leg(&self) -> u32 {
        self.state.leg()
    }

    /// Dice still in the pyramid.
    #[must_use]
    pub fn remaining_dice(&self) -> &'a [Die] {
        self.state.dice().remaining()
    }

    /// Value of the next betting ticket for a camel.
    #[must_use]
    pub fn next_ticket(&self, camel: CamelColor) -> Option<u32> {
        self.state.tickets().peek_next_value(camel)
    }

    /// Current race leader.
    #[must_use]
    pub fn leader(&self) -> Option<CamelColor> {
        self.board().leaderboard().first().map(|c| c.color)
    }

    /// Squares where the viewer could put a tile.
    #[must_use]
    pub fn legal_tile_positions(&self) -> Vec<i32> {
        self.state.legal_tile_positions(self.player)
    }

    /// Every action [`RaceState::apply`] would accept from the viewer now.
    ///
    /// Empty when it is not the viewer's turn or the race is over.
    #[must_use]
    pub fn legal_actions(&self) -> Vec<Action> {
        let Some(me) = self.me() else {
            return Vec::new();
        };
        if !self.is_my_turn() {
            return Vec::new();
        }
        let config = self.config();
        let mut actions = Vec::new();

        if !self.remaining_dice().is_empty() {
            actions.push(Action::Roll);
        }

        actions.extend(
            self.state
                .tickets()
                .colors()
                .filter(|&c| self.next_ticket(c).is_some())
                .map(Action::TakeTicket),
        );

        if config.desert_tiles && !me.placed_tile {
            for position in self.legal_tile_positions() {
                for kind in [TileKind::Oasis, TileKind::Mirage] {
                    actions.push(Action::PlaceTile { kind, position });
                }
            }
        }

        if config.final_wagers {
            for &camel in &me.wager_cards {
                for kind in [WagerKind::Winner, WagerKind::Loser] {
                    actions.push(Action::FinalWager { kind, camel });
                }
            }
        }

        if config.partnerships && me.partner.is_none() {
            actions.extend(
                self.players()
                    .iter()
                    .filter(|p| p.id != me.id && p.partner.is_none())
                    .map(|p| Action::Partner(p.id)),
            );
        }

        actions
    }
}
