//! Automated duel strategies.
//!
//! A `Racer` asks its strategy for a throw every round of a duel. Strategies
//! are configured per player in the settings file through `StrategyConfig`.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::{ConfigError, GameRng};
use crate::duel::Throw;

/// Chooses throws for duels.
pub trait ThrowStrategy: fmt::Debug {
    /// Pick the next throw.
    fn choose(&mut self, rng: &mut GameRng) -> Throw;
}

/// Uniformly random throws.
#[derive(Clone, Copy, Debug, Default)]
pub struct RandomThrows;

impl ThrowStrategy for RandomThrows {
    fn choose(&mut self, rng: &mut GameRng) -> Throw {
        rng.choose(&Throw::ALL).copied().unwrap_or(Throw::Rock)
    }
}

/// Always the same throw.
#[derive(Clone, Copy, Debug)]
pub struct FixedThrow(pub Throw);

impl ThrowStrategy for FixedThrow {
    fn choose(&mut self, _rng: &mut GameRng) -> Throw {
        self.0
    }
}

/// Repeats a fixed sequence of throws.
#[derive(Clone, Debug)]
pub struct CyclingThrows {
    sequence: Vec<Throw>,
    next: usize,
}

impl CyclingThrows {
    /// Create a cycling strategy. The sequence must not be empty.
    pub fn new(sequence: Vec<Throw>) -> Result<Self, ConfigError> {
        if sequence.is_empty() {
            return Err(ConfigError::InvalidStrategy("cycle needs at least one throw"));
        }
        Ok(Self { sequence, next: 0 })
    }
}

impl ThrowStrategy for CyclingThrows {
    fn choose(&mut self, _rng: &mut GameRng) -> Throw {
        let throw = self.sequence[self.next];
        self.next = (self.next + 1) % self.sequence.len();
        throw
    }
}

/// Random throws with relative weights for rock, paper and scissors.
#[derive(Clone, Copy, Debug)]
pub struct WeightedThrows {
    weights: [f32; 3],
}

impl WeightedThrows {
    /// Create a weighted strategy from rock, paper and scissors weights.
    pub fn new(weights: [f32; 3]) -> Result<Self, ConfigError> {
        let valid = weights.iter().all(|w| w.is_finite() && *w >= 0.0) && weights.iter().sum::<f32>() > 0.0;
        if !valid {
            return Err(ConfigError::InvalidStrategy("weights must be non-negative and not all zero"));
        }
        Ok(Self { weights })
    }
}

impl ThrowStrategy for WeightedThrows {
    fn choose(&mut self, rng: &mut GameRng) -> Throw {
        rng.choose_weighted(&self.weights)
            .map_or(Throw::Rock, |i| Throw::ALL[i])
    }
}

/// Serializable strategy selection.
///
/// ```json
/// "random"
/// {"fixed": "rock"}
/// {"cycle": ["rock", "paper"]}
/// {"weighted": [1.0, 2.0, 1.0]}
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyConfig {
    #[default]
    Random,
    Fixed(Throw),
    Cycle(Vec<Throw>),
    Weighted([f32; 3]),
}

impl StrategyConfig {
    /// Build the configured strategy.
    pub fn build(&self) -> Result<Box<dyn ThrowStrategy>, ConfigError> {
        match self {
            StrategyConfig::Random => Ok(Box::new(RandomThrows)),
            StrategyConfig::Fixed(throw) => Ok(Box::new(FixedThrow(*throw))),
            StrategyConfig::Cycle(sequence) => Ok(Box::new(CyclingThrows::new(sequence.clone())?)),
            StrategyConfig::Weighted(weights) => Ok(Box::new(WeightedThrows::new(*weights)?)),
        }
    }
}
