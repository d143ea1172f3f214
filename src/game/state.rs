//! Race state machine.
//!
//! A [`RaceState`] accepts one [`Action`] at a time from the player whose turn
//! it is. Every action either succeeds and yields an [`Event`], or is refused
//! with a [`Rejection`] and leaves the state exactly as it was.
//!
//! A roll that empties the pyramid settles the leg before the next action is
//! accepted. A roll that carries a racing camel over the finish line ends the
//! race on the spot: the open leg is settled, then the final wagers.

use serde::{Deserialize, Serialize};

use crate::config::{ConfigError, RaceConfig, StartLayout};
use crate::error::{Feature, PlacementProblem, Rejection};
use crate::game::{
    resolve, settle_leg, settle_race, BettingTicket, Board, Camel, CamelColor, DicePool, Die,
    FinalWagers, LegSettlement, Player, PlayerId, RaceSettlement, RaceView, Randomness, Roll,
    TicketLedger, Tile, TileKind, WagerKind, MAX_STEPS, MIN_STEPS,
};

/// Fewest players in a race.
pub const MIN_PLAYERS: usize = 2;
/// Most players in a race.
pub const MAX_PLAYERS: usize = 8;

/// Where the race is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Waiting for the current player to act.
    AwaitingAction,
    /// A racing camel crossed the finish line. Terminal.
    RaceComplete,
}

/// Something a player can do on their turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Take a pyramid ticket: roll the next die.
    Roll,
    /// Take the top betting ticket for a camel.
    TakeTicket(CamelColor),
    /// Put down (or move) the player's desert tile.
    PlaceTile {
        /// Oasis or mirage.
        kind: TileKind,
        /// Target square.
        position: i32,
    },
    /// Play a final-wager card.
    FinalWager {
        /// Winner or loser pile.
        kind: WagerKind,
        /// Camel backed.
        camel: CamelColor,
    },
    /// Partner with another player for the rest of the leg.
    Partner(PlayerId),
}

/// Final result of a race.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Standing {
    /// First-place racing camel.
    pub winner: CamelColor,
    /// Last-place racing camel.
    pub loser: CamelColor,
}

/// What a single roll did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RollReport {
    /// Player who rolled.
    pub player: PlayerId,
    /// Die, camel and steps.
    pub roll: Roll,
    /// Square the group left.
    pub from: i32,
    /// Square the group landed on.
    pub to: i32,
    /// Camels that moved, bottom first.
    pub group: Vec<CamelColor>,
    /// Desert tile the group landed on.
    pub tile: Option<Tile>,
    /// Coins paid to that tile's owner.
    pub tile_payout: u32,
}

/// Outcome of an accepted action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Event {
    /// A camel moved and the leg goes on.
    Moved(RollReport),
    /// The last die of the leg was rolled and the leg was settled.
    LegEnded {
        /// The final roll of the leg.
        roll: RollReport,
        /// Leg payouts.
        settlement: LegSettlement,
    },
    /// A racing camel finished. The open leg and the final wagers were settled.
    RaceEnded {
        /// The finishing roll.
        roll: RollReport,
        /// Payouts for the interrupted leg.
        leg: LegSettlement,
        /// Final-wager payouts.
        race: RaceSettlement,
    },
    /// A betting ticket changed hands.
    TicketTaken {
        /// Player who took it.
        player: PlayerId,
        /// The ticket.
        ticket: BettingTicket,
    },
    /// A desert tile went down.
    TilePlaced {
        /// The new tile.
        tile: Tile,
        /// The owner's previous tile, now retracted.
        replaced: Option<Tile>,
        /// Coins paid to the owner for placing it.
        payout: u32,
    },
    /// A final-wager card was played.
    WagerPlaced {
        /// Player who played it.
        player: PlayerId,
        /// Pile it went on.
        kind: WagerKind,
        /// Camel backed.
        camel: CamelColor,
    },
    /// Two players linked up for the leg.
    PartnershipFormed {
        /// Player who proposed.
        player: PlayerId,
        /// Their new partner.
        partner: PlayerId,
    },
}

/// Complete race state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RaceState {
    config: RaceConfig,
    board: Board,
    players: Vec<Player>,
    dice: DicePool,
    tickets: TicketLedger,
    wagers: FinalWagers,
    /// Current leg, from 1.
    leg: u32,
    /// Index into `players` of whose turn it is.
    current: usize,
    phase: Phase,
    standing: Option<Standing>,
}

impl RaceState {
    /// Set up a race: camels placed per the config's start layout.
    ///
    /// # Errors
    ///
    /// Returns an error if the config is invalid or the player count is out
    /// of range.
    pub fn new<S, R>(
        config: RaceConfig,
        names: impl IntoIterator<Item = S>,
        rng: &mut R,
    ) -> Result<Self, ConfigError>
    where
        S: Into<String>,
        R: Randomness + ?Sized,
    {
        config.validate()?;
        let board = starting_board(&config, rng);
        Self::with_board(config, names, board)
    }

    /// Set up a race on a prepared board.
    ///
    /// # Errors
    ///
    /// Returns an error if the config is invalid or the player count is out
    /// of range.
    pub fn with_board<S: Into<String>>(
        config: RaceConfig,
        names: impl IntoIterator<Item = S>,
        board: Board,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let cards: Vec<CamelColor> = if config.final_wagers {
            config.racing_camels.clone()
        } else {
            Vec::new()
        };
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&names.len()) {
            return Err(ConfigError::PlayerCount(names.len()));
        }
        let players: Vec<Player> = names
            .into_iter()
            .zip(1..)
            .map(|(name, id)| Player::new(id, name, config.starting_money, cards.iter().copied()))
            .collect();

        Ok(Self {
            dice: DicePool::new(config.dice.clone()),
            tickets: TicketLedger::new(&config.racing_camels, &config.ticket_values),
            wagers: FinalWagers::default(),
            board,
            players,
            leg: 1,
            current: 0,
            phase: Phase::AwaitingAction,
            standing: None,
            config,
        })
    }

    /// Race configuration.
    #[must_use]
    pub fn config(&self) -> &RaceConfig {
        &self.config
    }

    /// Camels and tiles.
    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Players in seating order.
    #[must_use]
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// Look up a player.
    #[must_use]
    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    /// Player whose turn it is.
    #[must_use]
    pub fn current_player(&self) -> PlayerId {
        self.players[self.current].id
    }

    /// Current leg, from 1.
    #[must_use]
    pub const fn leg(&self) -> u32 {
        self.leg
    }

    /// Lifecycle phase.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// The pyramid.
    #[must_use]
    pub fn dice(&self) -> &DicePool {
        &self.dice
    }

    /// Betting-ticket stacks.
    #[must_use]
    pub fn tickets(&self) -> &TicketLedger {
        &self.tickets
    }

    /// Final-wager piles.
    #[must_use]
    pub fn wagers(&self) -> &FinalWagers {
        &self.wagers
    }

    /// Winner and loser, once the race is over.
    #[must_use]
    pub const fn standing(&self) -> Option<Standing> {
        self.standing
    }

    /// Whether the race is over.
    #[must_use]
    pub fn is_over(&self) -> bool {
        self.phase == Phase::RaceComplete
    }

    /// Read-only projection for one player.
    #[must_use]
    pub fn view(&self, player: PlayerId) -> RaceView<'_> {
        RaceView::new(self, player)
    }

    /// Why `owner` cannot put a tile on `position`, if anything.
    ///
    /// The owner's own tile does not block, since placing retracts it.
    #[must_use]
    pub fn placement_problem(&self, owner: PlayerId, position: i32) -> Option<PlacementProblem> {
        let foreign_tile = |pos: i32| self.board.tile_at(pos).is_some_and(|t| t.owner != owner);

        if position == 0 {
            Some(PlacementProblem::StartSquare)
        } else if position < 0 || position >= self.board.finish_line() {
            Some(PlacementProblem::OffTrack)
        } else if self.board.is_occupied(position) {
            Some(PlacementProblem::Occupied)
        } else if foreign_tile(position) {
            Some(PlacementProblem::TileThere)
        } else if self.config.strict_tile_adjacency
            && (foreign_tile(position - 1) || foreign_tile(position + 1))
        {
            Some(PlacementProblem::AdjacentTile)
        } else {
            None
        }
    }

    /// Squares where `owner` could put a tile right now.
    #[must_use]
    pub fn legal_tile_positions(&self, owner: PlayerId) -> Vec<i32> {
        (1..self.board.finish_line())
            .filter(|&pos| self.placement_problem(owner, pos).is_none())
            .collect()
    }

    /// Apply one action for `player`.
    ///
    /// # Errors
    ///
    /// Returns a [`Rejection`] if the action is not allowed. State is untouched
    /// and no randomness is drawn in that case.
    pub fn apply<R: Randomness + ?Sized>(
        &mut self,
        player: PlayerId,
        action: Action,
        rng: &mut R,
    ) -> Result<Event, Rejection> {
        if self.is_over() {
            return Err(Rejection::RaceOver);
        }
        let idx = self.index_of(player)?;
        let expected = self.current_player();
        if expected != player {
            return Err(Rejection::OutOfTurn {
                expected,
                actual: player,
            });
        }

        let event = match action {
            Action::Roll => self.roll(idx, rng)?,
            Action::TakeTicket(camel) => self.take_ticket(idx, camel)?,
            Action::PlaceTile { kind, position } => self.place_tile(idx, kind, position)?,
            Action::FinalWager { kind, camel } => self.final_wager(idx, kind, camel)?,
            Action::Partner(other) => self.partner(idx, other)?,
        };

        if !self.is_over() {
            self.current = (self.current + 1) % self.players.len();
        }
        Ok(event)
    }

    fn index_of(&self, player: PlayerId) -> Result<usize, Rejection> {
        self.players
            .iter()
            .position(|p| p.id == player)
            .ok_or(Rejection::UnknownPlayer(player))
    }

    fn roll<R: Randomness + ?Sized>(&mut self, idx: usize, rng: &mut R) -> Result<Event, Rejection> {
        if self.dice.is_empty() {
            return Err(Rejection::DiceExhausted);
        }

        // A wildcard with nothing to move is refused before any draw.
        let reversed = self.board.reversed_colors();
        let remaining = self.dice.remaining();
        if reversed.is_empty() && remaining.contains(&Die::Wildcard) {
            return Err(Rejection::DiceExhausted);
        }

        let die_idx = rng.choose(remaining.len()) % remaining.len();
        let die = remaining[die_idx];
        let camel = match die {
            Die::Camel(color) => color,
            Die::Wildcard => reversed
                .get(rng.choose(reversed.len()) % reversed.len())
                .copied()
                .ok_or(Rejection::DiceExhausted)?,
        };
        let steps = rng.steps().clamp(MIN_STEPS, MAX_STEPS);
        self.dice.take(die_idx);

        let mv = resolve(&self.board, camel, steps);
        self.board = mv.board;

        let mut tile_payout = 0;
        if let Some(tile) = mv.tile.filter(|_| !self.config.tile_payout_on_place) {
            if let Some(owner) = self.players.iter_mut().find(|p| p.id == tile.owner) {
                owner.apply_earnings(i64::from(self.config.tile_payout));
                tile_payout = self.config.tile_payout;
            }
        }

        let roller = &mut self.players[idx];
        roller.pyramid_credits += 1;

        let report = RollReport {
            player: roller.id,
            roll: Roll { die, camel, steps },
            from: mv.from,
            to: mv.to,
            group: mv.group,
            tile: mv.tile,
            tile_payout,
        };

        if let Some(standing) = self.final_standing() {
            return Ok(self.finish_race(report, standing));
        }
        if self.dice.is_empty() {
            return Ok(self.finish_leg(report));
        }
        Ok(Event::Moved(report))
    }

    fn final_standing(&self) -> Option<Standing> {
        if !self.board.has_finished() {
            return None;
        }
        let winner = self.board.leaderboard().first()?.color;
        let loser = self.board.last_place()?.color;
        Some(Standing { winner, loser })
    }

    fn finish_leg(&mut self, roll: RollReport) -> Event {
        let settlement = settle_leg(self.leg, &self.board, &mut self.players);
        self.leg += 1;
        self.dice.reset();
        self.tickets.reset_for_new_leg();
        if self.config.clear_tiles_each_leg {
            self.board.clear_tiles();
        }
        Event::LegEnded { roll, settlement }
    }

    fn finish_race(&mut self, roll: RollReport, standing: Standing) -> Event {
        let leg = settle_leg(self.leg, &self.board, &mut self.players);
        let race = settle_race(
            standing.winner,
            standing.loser,
            &self.wagers,
            &self.config.final_payouts,
            &mut self.players,
        );
        self.phase = Phase::RaceComplete;
        self.standing = Some(standing);
        Event::RaceEnded { roll, leg, race }
    }

    fn take_ticket(&mut self, idx: usize, camel: CamelColor) -> Result<Event, Rejection> {
        let value = self.tickets.take_ticket(camel)?;
        let ticket = BettingTicket { camel, value };
        let player = &mut self.players[idx];
        player.tickets.push(ticket);
        Ok(Event::TicketTaken {
            player: player.id,
            ticket,
        })
    }

    fn place_tile(&mut self, idx: usize, kind: TileKind, position: i32) -> Result<Event, Rejection> {
        if !self.config.desert_tiles {
            return Err(Rejection::FeatureDisabled(Feature::DesertTiles));
        }
        let owner = self.players[idx].id;
        if self.players[idx].placed_tile {
            return Err(Rejection::TileAlreadyPlaced);
        }
        if let Some(problem) = self.placement_problem(owner, position) {
            if self.legal_tile_positions(owner).is_empty() {
                return Err(Rejection::NoTilePosition);
            }
            return Err(Rejection::IllegalPlacement { position, problem });
        }

        let tile = Tile::new(position, kind, owner);
        let replaced = self.board.place_tile(tile);
        let player = &mut self.players[idx];
        player.placed_tile = true;
        let payout = if self.config.tile_payout_on_place {
            player.apply_earnings(i64::from(self.config.tile_payout));
            self.config.tile_payout
        } else {
            0
        };
        Ok(Event::TilePlaced {
            tile,
            replaced,
            payout,
        })
    }

    fn final_wager(
        &mut self,
        idx: usize,
        kind: WagerKind,
        camel: CamelColor,
    ) -> Result<Event, Rejection> {
        if !self.config.final_wagers {
            return Err(Rejection::FeatureDisabled(Feature::FinalWagers));
        }
        if !self.config.racing_camels.contains(&camel) {
            return Err(Rejection::NoTicketStack(camel));
        }
        let player = &mut self.players[idx];
        if !player.wager_cards.remove(&camel) {
            return Err(Rejection::WagerCardSpent(camel));
        }
        let id = player.id;
        self.wagers.place(kind, id, camel);
        Ok(Event::WagerPlaced {
            player: id,
            kind,
            camel,
        })
    }

    fn partner(&mut self, idx: usize, other: PlayerId) -> Result<Event, Rejection> {
        if !self.config.partnerships {
            return Err(Rejection::FeatureDisabled(Feature::Partnerships));
        }
        let id = self.players[idx].id;
        if other == id {
            return Err(Rejection::SelfPartnership);
        }
        let other_idx = self.index_of(other)?;
        if self.players[idx].partner.is_some() {
            return Err(Rejection::AlreadyPartnered(id));
        }
        if self.players[other_idx].partner.is_some() {
            return Err(Rejection::AlreadyPartnered(other));
        }

        self.players[idx].partner = Some(other);
        self.players[other_idx].partner = Some(id);
        Ok(Event::PartnershipFormed {
            player: id,
            partner: other,
        })
    }
}

/// Opening board for a config.
///
/// `Stacked` puts racing camels on square 0 and reversed camels just short of
/// the finish, each group stacked in listed order. `Rolled` rolls one step
/// count per camel: racing camels start at `steps - 1`, reversed camels at
/// `finish_line - steps`, each landing on top of camels already there.
fn starting_board<R: Randomness + ?Sized>(config: &RaceConfig, rng: &mut R) -> Board {
    let order = config.racing_camels.iter().chain(&config.reversed_camels);
    let mut camels: Vec<Camel> = Vec::with_capacity(config.racing_camels.len() + config.reversed_camels.len());

    for &color in order {
        let position = match (config.start, color.is_racing()) {
            (StartLayout::Stacked, true) => 0,
            (StartLayout::Stacked, false) => config.finish_line - 1,
            (StartLayout::Rolled, true) => i32::from(rng.steps().clamp(MIN_STEPS, MAX_STEPS)) - 1,
            (StartLayout::Rolled, false) => {
                config.finish_line - i32::from(rng.steps().clamp(MIN_STEPS, MAX_STEPS))
            }
        };
        let stack_order = camels
            .iter()
            .filter(|c| c.position == position)
            .map(|c| c.stack_order + 1)
            .max()
            .unwrap_or(0);
        camels.push(Camel::new(color, position, stack_order));
    }

    Board::new(config.finish_line, camels)
}
