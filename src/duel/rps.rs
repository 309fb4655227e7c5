//! Rock-paper-scissors duels.
//!
//! Both players throw and the outcome matrix is read from the first seat's
//! row. A tie means another round. After `max_throws` tied rounds a fair
//! coin decides, so a matrix of all zeros still terminates.

use tracing::trace;

use crate::core::{GameRng, OutcomeMatrix, Player};

use super::{DuelOutcome, DuelResolver, Seat};

/// Rock-paper-scissors duel resolver.
#[derive(Clone, Debug)]
pub struct RockPaperScissors {
    rng: GameRng,
    max_throws: u32,
}

impl RockPaperScissors {
    /// Default cap on tied rounds before a coin flip.
    pub const DEFAULT_MAX_THROWS: u32 = 100;

    /// Create a resolver drawing player randomness from `rng`.
    #[must_use]
    pub fn new(rng: GameRng) -> Self {
        Self {
            rng,
            max_throws: Self::DEFAULT_MAX_THROWS,
        }
    }

    /// Set the tie cap. Clamped to at least 1.
    #[must_use]
    pub fn with_max_throws(mut self, max_throws: u32) -> Self {
        self.max_throws = max_throws.max(1);
        self
    }
}

impl DuelResolver for RockPaperScissors {
    fn resolve(
        &mut self,
        first: &mut dyn Player,
        second: &mut dyn Player,
        matrix: &OutcomeMatrix,
    ) -> DuelOutcome {
        for throws in 1..=self.max_throws {
            let a = first.choose_throw(&mut self.rng);
            let b = second.choose_throw(&mut self.rng);
            trace!(first = first.name(), second = second.name(), %a, %b, "throw");

            match matrix.outcome(a, b) {
                1 => return DuelOutcome { winner: Seat::First, throws },
                -1 => return DuelOutcome { winner: Seat::Second, throws },
                _ => {}
            }
        }

        let winner = if self.rng.gen_bool(0.5) { Seat::First } else { Seat::Second };
        DuelOutcome {
            winner,
            throws: self.max_throws,
        }
    }
}
