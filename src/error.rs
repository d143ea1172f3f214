//! Reasons the engine refuses an action.
//!
//! A rejection never changes state. The driver decides how to present it.

use std::fmt;

use thiserror::Error;

use crate::game::{CamelColor, PlayerId};

/// Broad category of a rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RejectionKind {
    /// Out of turn, race already settled, or a disabled feature.
    InvalidAction,
    /// Nothing left to take: tickets, dice, cards or tile squares.
    ResourceExhausted,
    /// Tile on a forbidden square.
    IllegalPlacement,
}

/// Why a desert tile cannot go on a square.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlacementProblem {
    /// Square 0.
    StartSquare,
    /// At or past the finish line.
    OffTrack,
    /// A camel stands there.
    Occupied,
    /// Another player's tile is there.
    TileThere,
    /// Next to another player's tile.
    AdjacentTile,
}

impl fmt::Display for PlacementProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            PlacementProblem::StartSquare => "the start square",
            PlacementProblem::OffTrack => "off the track",
            PlacementProblem::Occupied => "occupied by a camel",
            PlacementProblem::TileThere => "already tiled",
            PlacementProblem::AdjacentTile => "next to another tile",
        };
        f.write_str(text)
    }
}

/// Optional rule a rejected action needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    /// Desert tiles.
    DesertTiles,
    /// Final winner/loser wagers.
    FinalWagers,
    /// Leg partnerships.
    Partnerships,
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Feature::DesertTiles => "desert tiles",
            Feature::FinalWagers => "final wagers",
            Feature::Partnerships => "partnerships",
        };
        f.write_str(text)
    }
}

/// A refused action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Rejection {
    /// Someone else's turn.
    #[error("it is player {expected}'s turn, not player {actual}'s")]
    OutOfTurn {
        /// Player whose turn it is.
        expected: PlayerId,
        /// Player who tried to act.
        actual: PlayerId,
    },
    /// The race has been settled.
    #[error("the race is over")]
    RaceOver,
    /// The action belongs to a rule not enabled for this race.
    #[error("{0} are not enabled in this race")]
    FeatureDisabled(Feature),
    /// No such player.
    #[error("no player {0}")]
    UnknownPlayer(PlayerId),
    /// Only racing camels in this race carry tickets and wager cards.
    #[error("{0} camel has no betting tickets in this race")]
    NoTicketStack(CamelColor),
    /// A tile was already placed this leg.
    #[error("a desert tile was already placed this leg")]
    TileAlreadyPlaced,
    /// Cannot partner with oneself.
    #[error("a player cannot partner with themselves")]
    SelfPartnership,
    /// One side of a partnership is already taken.
    #[error("player {0} already has a partner")]
    AlreadyPartnered(PlayerId),
    /// Ticket stack empty.
    #[error("no {0} betting tickets left this leg")]
    TicketsExhausted(CamelColor),
    /// Pyramid empty.
    #[error("no dice left in the pyramid")]
    DiceExhausted,
    /// No square accepts a tile.
    #[error("no square can take a desert tile")]
    NoTilePosition,
    /// Final-wager card for that camel already spent.
    #[error("the {0} final-wager card was already played")]
    WagerCardSpent(CamelColor),
    /// Tile on a forbidden square.
    #[error("cannot place a desert tile on square {position}: {problem}")]
    IllegalPlacement {
        /// Requested square.
        position: i32,
        /// What is wrong with it.
        problem: PlacementProblem,
    },
}

impl Rejection {
    /// Broad category.
    #[must_use]
    pub const fn kind(&self) -> RejectionKind {
        match self {
            Rejection::OutOfTurn { .. }
            | Rejection::RaceOver
            | Rejection::FeatureDisabled(_)
            | Rejection::UnknownPlayer(_)
            | Rejection::NoTicketStack(_)
            | Rejection::TileAlreadyPlaced
            | Rejection::SelfPartnership
            | Rejection::AlreadyPartnered(_) => RejectionKind::InvalidAction,
            Rejection::TicketsExhausted(_)
            | Rejection::DiceExhausted
            | Rejection::NoTilePosition
            | Rejection::WagerCardSpent(_) => RejectionKind::ResourceExhausted,
            Rejection::IllegalPlacement { .. } => RejectionKind::IllegalPlacement,
        }
    }
}
