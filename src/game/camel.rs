//! Camel identities and per-camel state.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Every camel color that can appear on the track.
///
/// The set is fixed and partitioned: red, blue, green, yellow and purple race
/// forward; white and black are the reversed ("crazy") camels that run the
/// track backwards and can never win or place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CamelColor {
    /// Racing camel.
    Red,
    /// Racing camel.
    Blue,
    /// Racing camel.
    Green,
    /// Racing camel.
    Yellow,
    /// Racing camel.
    Purple,
    /// Reversed camel.
    White,
    /// Reversed camel.
    Black,
}

impl CamelColor {
    /// All racing colors in their canonical order.
    pub const RACING: [CamelColor; 5] = [
        CamelColor::Red,
        CamelColor::Blue,
        CamelColor::Green,
        CamelColor::Yellow,
        CamelColor::Purple,
    ];

    /// All reversed colors in their canonical order.
    pub const REVERSED: [CamelColor; 2] = [CamelColor::White, CamelColor::Black];

    /// Lowercase name, as used in configs and recordings.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            CamelColor::Red => "red",
            CamelColor::Blue => "blue",
            CamelColor::Green => "green",
            CamelColor::Yellow => "yellow",
            CamelColor::Purple => "purple",
            CamelColor::White => "white",
            CamelColor::Black => "black",
        }
    }

    /// Direction this color always travels in.
    #[must_use]
    pub const fn direction(self) -> Direction {
        match self {
            CamelColor::White | CamelColor::Black => Direction::Backward,
            _ => Direction::Forward,
        }
    }

    /// Whether this color competes for the leaderboard.
    #[must_use]
    pub const fn is_racing(self) -> bool {
        matches!(self.direction(), Direction::Forward)
    }
}

impl fmt::Display for CamelColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Travel direction along the track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Towards the finish line.
    Forward,
    /// Towards the start square.
    Backward,
}

impl Direction {
    /// +1 for forward, -1 for backward.
    #[must_use]
    pub const fn sign(self) -> i32 {
        match self {
            Direction::Forward => 1,
            Direction::Backward => -1,
        }
    }
}

/// A single camel on the track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Camel {
    /// Identity.
    pub color: CamelColor,
    /// Track index.
    pub position: i32,
    /// Height within the stack at `position` (0 = bottom).
    pub stack_order: u32,
}

impl Camel {
    /// Create a camel at a position and stack height.
    #[must_use]
    pub const fn new(color: CamelColor, position: i32, stack_order: u32) -> Self {
        Self {
            color,
            position,
            stack_order,
        }
    }

    /// Direction this camel travels in.
    #[must_use]
    pub const fn direction(&self) -> Direction {
        self.color.direction()
    }

    /// Whether this camel competes for the leaderboard.
    #[must_use]
    pub const fn is_racing(&self) -> bool {
        self.color.is_racing()
    }
}
