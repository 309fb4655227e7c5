//! Deterministic random number generation and dice.
//!
//! A game seeds one `GameRng` and splits it into named context streams, so
//! the dice sequence does not shift when the number of duel throws changes.
//!
//! ## Dice
//!
//! The board only needs the sum of a roll, but `DiceRoll` keeps the faces
//! for logging and reports.
//!
//! ```
//! use rust_ladders::core::{DiceConfig, DiceSource, GameRng};
//!
//! let mut rng = GameRng::new(42);
//! let roll = rng.roll(&DiceConfig::new(2, 6));
//! assert_eq!(roll.faces().len(), 2);
//! assert!((2..=12).contains(&roll.total()));
//! ```

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rustc_hash::FxHasher;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::hash::{Hash, Hasher};

use super::config::DiceConfig;

/// Seeded ChaCha8 generator with named context streams.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl GameRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// The seed this generator was created from.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Derive the stream for a named context (`"dice"`, `"duel"`).
    ///
    /// Same seed and name, same stream.
    #[must_use]
    pub fn for_context(&self, context: &str) -> Self {
        let mut hasher = FxHasher::default();
        self.seed.hash(&mut hasher);
        context.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    /// True with the given probability.
    pub fn gen_bool(&mut self, probability: f64) -> bool {
        self.inner.gen_bool(probability)
    }

    /// Roll a single fair die with faces `1..=sides`.
    ///
    /// A die with no sides always shows 0.
    pub fn roll_die(&mut self, sides: u32) -> u32 {
        if sides == 0 {
            return 0;
        }
        self.inner.gen_range(1..=sides)
    }

    /// Pick an element of `slice` uniformly.
    #[must_use]
    pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        slice.choose(&mut self.inner)
    }

    /// Pick an index with probability proportional to its weight.
    ///
    /// `None` when there is nothing to pick: no weights, or none positive.
    pub fn choose_weighted(&mut self, weights: &[f32]) -> Option<usize> {
        let total: f32 = weights.iter().filter(|&&w| w > 0.0).sum();
        if total <= 0.0 {
            return None;
        }

        let mut remaining = self.inner.gen::<f32>() * total;
        for (i, &weight) in weights.iter().enumerate().filter(|&(_, &w)| w > 0.0) {
            remaining -= weight;
            if remaining <= 0.0 {
                return Some(i);
            }
        }

        // Rounding can leave a sliver past the last positive weight
        weights.iter().rposition(|&w| w > 0.0)
    }
}

/// Faces of one dice roll.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceRoll {
    faces: SmallVec<[u32; 4]>,
}

impl DiceRoll {
    /// Build a roll from explicit faces.
    #[must_use]
    pub fn from_faces(faces: &[u32]) -> Self {
        Self {
            faces: SmallVec::from_slice(faces),
        }
    }

    /// Individual faces, in roll order.
    #[must_use]
    pub fn faces(&self) -> &[u32] {
        &self.faces
    }

    /// Sum of all faces.
    #[must_use]
    pub fn total(&self) -> i64 {
        self.faces.iter().map(|&f| i64::from(f)).sum()
    }
}

/// Source of dice rolls for the turn engine.
pub trait DiceSource {
    /// Roll the configured dice.
    ///
    /// `dice` is expected to have passed `DiceConfig::validate`. `GameRng`
    /// still never panics on an unvalidated config: zero-sided dice show 0.
    fn roll(&mut self, dice: &DiceConfig) -> DiceRoll;
}

impl DiceSource for GameRng {
    fn roll(&mut self, dice: &DiceConfig) -> DiceRoll {
        let faces = (0..dice.count)
            .map(|_| match &dice.bias {
                // Validated weights always yield an index
                Some(weights) => self.choose_weighted(weights).map_or(1, |i| i as u32 + 1),
                None => self.roll_die(dice.sides),
            })
            .collect();
        DiceRoll { faces }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sequence(rng: &mut GameRng) -> Vec<u32> {
        (0..10).map(|_| rng.roll_die(1000)).collect()
    }

    #[test]
    fn test_determinism() {
        let mut rng1 = GameRng::new(42);
        let mut rng2 = GameRng::new(42);

        assert_eq!(sequence(&mut rng1), sequence(&mut rng2));
    }

    #[test]
    fn test_different_seeds() {
        let mut rng1 = GameRng::new(1);
        let mut rng2 = GameRng::new(2);

        assert_ne!(sequence(&mut rng1), sequence(&mut rng2));
    }

    #[test]
    fn test_context_streams() {
        let rng = GameRng::new(42);
        let mut dice = rng.for_context("dice");
        let mut duel = rng.for_context("duel");
        assert_ne!(sequence(&mut dice), sequence(&mut duel));

        let mut again = GameRng::new(42).for_context("duel");
        let mut duel = rng.for_context("duel");
        assert_eq!(sequence(&mut again), sequence(&mut duel));
    }

    #[test]
    fn test_choose_weighted() {
        let mut rng = GameRng::new(42);

        let weights = vec![0.0, 100.0, 0.0];
        for _ in 0..10 {
            assert_eq!(rng.choose_weighted(&weights), Some(1));
        }

        assert_eq!(rng.choose_weighted(&[]), None);
        assert_eq!(rng.choose_weighted(&[0.0, 0.0]), None);
    }

    #[test]
    fn test_context_seed_differs_from_parent() {
        let rng = GameRng::new(42);
        assert_ne!(rng.for_context("dice").seed(), rng.seed());
    }

    #[test]
    fn test_fair_roll_bounds() {
        let mut rng = GameRng::new(7);
        let dice = DiceConfig::new(3, 4);
        for _ in 0..200 {
            let roll = rng.roll(&dice);
            assert_eq!(roll.faces().len(), 3);
            assert!(roll.faces().iter().all(|f| (1..=4).contains(f)));
            assert!((3..=12).contains(&roll.total()));
        }
    }

    #[test]
    fn test_biased_roll_uses_weights() {
        let mut rng = GameRng::new(7);
        let dice = DiceConfig::new(2, 6).with_bias(vec![0.0, 0.0, 0.0, 0.0, 0.0, 1.0]);
        for _ in 0..20 {
            assert_eq!(rng.roll(&dice).total(), 12);
        }
    }

    #[test]
    fn test_zero_sided_dice_do_not_panic() {
        let mut rng = GameRng::new(7);
        assert_eq!(rng.roll_die(0), 0);

        let roll = rng.roll(&DiceConfig::new(2, 0));
        assert_eq!(roll.faces(), &[0, 0]);
        assert_eq!(roll.total(), 0);
    }

    #[test]
    fn test_roll_from_faces() {
        let roll = DiceRoll::from_faces(&[3, 5]);
        assert_eq!(roll.total(), 8);
        assert_eq!(DiceRoll::default().total(), 0);
    }
}
