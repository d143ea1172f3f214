//! Dice: the per-leg pool and the injectable randomness behind it.
//!
//! All chance in a race flows through [`Randomness`]: which die leaves the
//! pyramid, which reversed camel a wildcard die stands for, and how many
//! steps it shows. Production code seeds a [`SeededRandomness`]; tests script
//! exact outcomes with [`ScriptedRandomness`].

use std::collections::VecDeque;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::game::CamelColor;

/// Fewest steps a die can show.
pub const MIN_STEPS: u8 = 1;
/// Most steps a die can show.
pub const MAX_STEPS: u8 = 3;

/// One die in the pyramid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Die {
    /// Moves the camel of this color.
    Camel(CamelColor),
    /// Grey die: moves one of the reversed camels, chosen when rolled.
    Wildcard,
}

/// A resolved die: which die, which camel it moved, how far.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roll {
    /// Die taken from the pyramid.
    pub die: Die,
    /// Camel the die moved.
    pub camel: CamelColor,
    /// Steps shown.
    pub steps: u8,
}

/// Source of every random choice the engine makes.
pub trait Randomness {
    /// Pick an index in `0..len`. Never called with `len == 0`.
    fn choose(&mut self, len: usize) -> usize;

    /// Steps shown on a die, in `MIN_STEPS..=MAX_STEPS`.
    fn steps(&mut self) -> u8;
}

/// Seeded `ChaCha8` stream. Same seed, same race.
#[derive(Debug, Clone)]
pub struct SeededRandomness {
    rng: ChaCha8Rng,
}

impl SeededRandomness {
    /// Create a stream from a seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl Randomness for SeededRandomness {
    fn choose(&mut self, len: usize) -> usize {
        self.rng.random_range(0..len.max(1))
    }

    fn steps(&mut self) -> u8 {
        self.rng.random_range(MIN_STEPS..=MAX_STEPS)
    }
}

/// Pre-recorded outcomes, consumed in order.
///
/// Out-of-range choices wrap, out-of-range steps are clamped. Once a queue
/// runs dry it keeps answering with the first die and one step.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRandomness {
    choices: VecDeque<usize>,
    steps: VecDeque<u8>,
}

impl ScriptedRandomness {
    /// Script choices and step counts separately.
    #[must_use]
    pub fn new(choices: impl IntoIterator<Item = usize>, steps: impl IntoIterator<Item = u8>) -> Self {
        Self {
            choices: choices.into_iter().collect(),
            steps: steps.into_iter().collect(),
        }
    }

    /// Queue another choice.
    pub fn push_choice(&mut self, choice: usize) {
        self.choices.push_back(choice);
    }

    /// Queue another step count.
    pub fn push_steps(&mut self, steps: u8) {
        self.steps.push_back(steps);
    }
}

impl Randomness for ScriptedRandomness {
    fn choose(&mut self, len: usize) -> usize {
        self.choices.pop_front().unwrap_or(0) % len.max(1)
    }

    fn steps(&mut self) -> u8 {
        self.steps
            .pop_front()
            .unwrap_or(MIN_STEPS)
            .clamp(MIN_STEPS, MAX_STEPS)
    }
}

/// Dice not yet rolled this leg.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DicePool {
    /// Full per-leg set, in configured order.
    full: Vec<Die>,
    /// Still in the pyramid, in configured order.
    remaining: Vec<Die>,
    /// Rolled this leg, in roll order.
    rolled: Vec<Die>,
}

impl DicePool {
    /// Fresh pool holding the full set.
    #[must_use]
    pub fn new(full: Vec<Die>) -> Self {
        Self {
            remaining: full.clone(),
            full,
            rolled: Vec::new(),
        }
    }

    /// Dice still in the pyramid.
    #[must_use]
    pub fn remaining(&self) -> &[Die] {
        &self.remaining
    }

    /// Dice already rolled this leg.
    #[must_use]
    pub fn rolled(&self) -> &[Die] {
        &self.rolled
    }

    /// Full per-leg set.
    #[must_use]
    pub fn full(&self) -> &[Die] {
        &self.full
    }

    /// Whether every die has been rolled.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.remaining.is_empty()
    }

    /// Remove and return the die at `index` (wrapped into range).
    ///
    /// Returns `None` when the pool is empty.
    pub fn take(&mut self, index: usize) -> Option<Die> {
        if self.remaining.is_empty() {
            return None;
        }
        let die = self.remaining.remove(index % self.remaining.len());
        self.rolled.push(die);
        Some(die)
    }

    /// Put every die back for a new leg.
    pub fn reset(&mut self) {
        self.remaining.clone_from(&self.full);
        self.rolled.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classic_dice() -> Vec<Die> {
        CamelColor::RACING.into_iter().map(Die::Camel).collect()
    }

    #[test]
    fn test_pool_shrinks_and_resets() {
        let mut pool = DicePool::new(classic_dice());
        assert_eq!(pool.remaining().len(), 5);

        assert_eq!(pool.take(1), Some(Die::Camel(CamelColor::Blue)));
        assert_eq!(pool.remaining().len(), 4);
        assert_eq!(pool.rolled(), &[Die::Camel(CamelColor::Blue)]);

        while !pool.is_empty() {
            pool.take(0);
        }
        assert_eq!(pool.take(0), None);
        assert_eq!(pool.rolled().len(), 5);

        pool.reset();
        assert_eq!(pool.remaining(), pool.full());
        assert!(pool.rolled().is_empty());
    }

    #[test]
    fn test_take_wraps_index() {
        let mut pool = DicePool::new(classic_dice());
        assert_eq!(pool.take(7), Some(Die::Camel(CamelColor::Green)));
    }

    #[test]
    fn test_seeded_is_deterministic() {
        let mut a = SeededRandomness::new(42);
        let mut b = SeededRandomness::new(42);
        for _ in 0..100 {
            assert_eq!(a.choose(5), b.choose(5));
            assert_eq!(a.steps(), b.steps());
        }
    }

    #[test]
    fn test_seeded_ranges() {
        let mut rng = SeededRandomness::new(7);
        let mut seen = [false; 3];
        for _ in 0..1000 {
            let steps = rng.steps();
            assert!((MIN_STEPS..=MAX_STEPS).contains(&steps));
            seen[usize::from(steps - 1)] = true;
            assert!(rng.choose(4) < 4);
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn test_scripted_sequence() {
        let mut rng = ScriptedRandomness::new([2, 9], [3, 7]);
        assert_eq!(rng.choose(5), 2);
        assert_eq!(rng.choose(5), 4);
        assert_eq!(rng.choose(5), 0);
        assert_eq!(rng.steps(), 3);
        assert_eq!(rng.steps(), MAX_STEPS);
        assert_eq!(rng.steps(), MIN_STEPS);

        rng.push_choice(1);
        rng.push_steps(2);
        assert_eq!(rng.choose(3), 1);
        assert_eq!(rng.steps(), 2);
    }
}
