//! Track, desert tiles and the standings queries over them.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::game::{Camel, CamelColor, Direction, PlayerId};

/// Squares past the finish line a camel can still be placed on.
///
/// The furthest a camel can land from `finish_line - 1` is three steps plus
/// one tile push, so no legal move is ever cut short by the clamp.
pub const FINISH_SLACK: i32 = 3;

/// Polarity of a desert tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TileKind {
    /// Pushes a landing camel one square forward.
    Oasis,
    /// Pushes a landing camel one square back.
    Mirage,
}

impl TileKind {
    /// Extra displacement applied to a camel landing on the tile.
    #[must_use]
    pub const fn displacement(self) -> i32 {
        match self {
            TileKind::Oasis => 1,
            TileKind::Mirage => -1,
        }
    }
}

/// A player-placed desert tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tile {
    /// Track index (never the start square).
    pub position: i32,
    /// Oasis or mirage.
    pub kind: TileKind,
    /// Player who placed it.
    pub owner: PlayerId,
}

impl Tile {
    /// Create a new tile.
    #[must_use]
    pub const fn new(position: i32, kind: TileKind, owner: PlayerId) -> Self {
        Self {
            position,
            kind,
            owner,
        }
    }
}

/// Camels and tiles on a bounded track.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    /// Every camel, in setup order.
    camels: Vec<Camel>,
    /// Active desert tiles, at most one per square.
    tiles: Vec<Tile>,
    /// First square that counts as finished.
    finish_line: i32,
}

impl Board {
    /// Create a board without tiles.
    #[must_use]
    pub fn new(finish_line: i32, camels: Vec<Camel>) -> Self {
        Self {
            camels,
            tiles: Vec::new(),
            finish_line,
        }
    }

    /// Same track and tiles, different camels.
    #[must_use]
    pub(crate) fn with_camels(&self, camels: Vec<Camel>) -> Self {
        Self {
            camels,
            tiles: self.tiles.clone(),
            finish_line: self.finish_line,
        }
    }

    /// First square that counts as finished.
    #[must_use]
    pub const fn finish_line(&self) -> i32 {
        self.finish_line
    }

    /// Highest square a camel can occupy.
    #[must_use]
    pub const fn max_position(&self) -> i32 {
        self.finish_line.saturating_add(FINISH_SLACK)
    }

    /// All camels in setup order.
    #[must_use]
    pub fn camels(&self) -> &[Camel] {
        &self.camels
    }

    /// Look up a camel by color.
    #[must_use]
    pub fn camel(&self, color: CamelColor) -> Option<&Camel> {
        self.camels.iter().find(|c| c.color == color)
    }

    /// Camels at a square, bottom of the stack first.
    #[must_use]
    pub fn occupants(&self, position: i32) -> Vec<&Camel> {
        let mut here: Vec<&Camel> = self
            .camels
            .iter()
            .filter(|c| c.position == position)
            .collect();
        here.sort_by_key(|c| c.stack_order);
        here
    }

    /// Whether any camel stands on a square.
    #[must_use]
    pub fn is_occupied(&self, position: i32) -> bool {
        self.camels.iter().any(|c| c.position == position)
    }

    /// Reversed camels on the board, in setup order.
    #[must_use]
    pub fn reversed_colors(&self) -> Vec<CamelColor> {
        self.camels
            .iter()
            .filter(|c| !c.is_racing())
            .map(|c| c.color)
            .collect()
    }

    /// Active tiles.
    #[must_use]
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Tile on a square, if any.
    #[must_use]
    pub fn tile_at(&self, position: i32) -> Option<&Tile> {
        self.tiles.iter().find(|t| t.position == position)
    }

    /// The tile a player currently has on the track.
    #[must_use]
    pub fn tile_of(&self, owner: PlayerId) -> Option<&Tile> {
        self.tiles.iter().find(|t| t.owner == owner)
    }

    /// Put a tile down, retracting the owner's previous tile.
    ///
    /// Returns the retracted tile. Legality is the caller's concern.
    pub fn place_tile(&mut self, tile: Tile) -> Option<Tile> {
        let previous = self
            .tiles
            .iter()
            .position(|t| t.owner == tile.owner)
            .map(|idx| self.tiles.remove(idx));
        self.tiles.push(tile);
        previous
    }

    /// Remove every tile.
    pub fn clear_tiles(&mut self) {
        self.tiles.clear();
    }

    /// Racing camels from first to last place.
    ///
    /// Ordered by position, then by stack height. Stack orders are unique per
    /// square, so the order is total.
    #[must_use]
    pub fn leaderboard(&self) -> Vec<&Camel> {
        let mut racing: Vec<&Camel> = self.camels.iter().filter(|c| c.is_racing()).collect();
        racing.sort_by(|a, b| standing(a, b));
        racing
    }

    /// Racing camel in last place.
    #[must_use]
    pub fn last_place(&self) -> Option<&Camel> {
        self.camels
            .iter()
            .filter(|c| c.is_racing())
            .min_by(|a, b| standing(b, a))
    }

    /// Reversed camels ranked along their own direction of travel.
    ///
    /// Informational only: reversed camels never win or place.
    #[must_use]
    pub fn reversed_standings(&self) -> Vec<&Camel> {
        let mut reversed: Vec<&Camel> = self.camels.iter().filter(|c| !c.is_racing()).collect();
        reversed.sort_by(|a, b| standing(a, b));
        reversed
    }

    /// 0-based leaderboard rank of a racing camel.
    #[must_use]
    pub fn rank_of(&self, color: CamelColor) -> Option<usize> {
        self.leaderboard().iter().position(|c| c.color == color)
    }

    /// Whether any racing camel has reached the finish line.
    #[must_use]
    pub fn has_finished(&self) -> bool {
        self.camels
            .iter()
            .any(|c| c.is_racing() && c.position >= self.finish_line)
    }
}

/// Better standing sorts first.
fn standing(a: &Camel, b: &Camel) -> Ordering {
    let by_position = match a.direction() {
        Direction::Forward => b.position.cmp(&a.position),
        Direction::Backward => a.position.cmp(&b.position),
    };
    by_position.then_with(|| b.stack_order.cmp(&a.stack_order))
}
