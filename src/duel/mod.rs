//! Duel resolution.
//!
//! When two players clash on a square they duel. The board does not care
//! how a duel is decided, only that it always produces a winner and a loser.
//! Resolvers implement `DuelResolver`; the built-in one plays
//! rock-paper-scissors against the configured `OutcomeMatrix`.
//!
//! ## Example Usage
//!
//! ```
//! use rust_ladders::core::{GameRng, OutcomeMatrix, Player, PlayerId, Racer};
//! use rust_ladders::duel::{DuelResolver, RockPaperScissors, Seat, Throw};
//! use rust_ladders::strategy::FixedThrow;
//!
//! let mut rock = Racer::new(PlayerId::new(0), "Rock", Box::new(FixedThrow(Throw::Rock)));
//! let mut paper = Racer::new(PlayerId::new(1), "Paper", Box::new(FixedThrow(Throw::Paper)));
//!
//! let mut resolver = RockPaperScissors::new(GameRng::new(1));
//! let outcome = resolver.resolve(&mut rock, &mut paper, &OutcomeMatrix::STANDARD);
//! assert_eq!(outcome.winner, Seat::Second);
//! ```

mod rps;

pub use rps::RockPaperScissors;

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::{OutcomeMatrix, Player};

/// One hand in a rock-paper-scissors round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Throw {
    Rock,
    Paper,
    Scissors,
}

impl Throw {
    /// All throws in outcome-matrix order.
    pub const ALL: [Throw; 3] = [Throw::Rock, Throw::Paper, Throw::Scissors];

    /// Row/column index in an `OutcomeMatrix`.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Throw::Rock => 0,
            Throw::Paper => 1,
            Throw::Scissors => 2,
        }
    }
}

impl fmt::Display for Throw {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Throw::Rock => "rock",
            Throw::Paper => "paper",
            Throw::Scissors => "scissors",
        };
        f.write_str(name)
    }
}

/// Which side of a duel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Seat {
    First,
    Second,
}

/// Result of a decisive duel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuelOutcome {
    /// The seat that won.
    pub winner: Seat,
    /// Rounds thrown before the duel was decided (at least 1).
    pub throws: u32,
}

impl DuelOutcome {
    /// Map the seats onto the two duellists' handles, as `(winner, loser)`.
    #[must_use]
    pub fn winner_and_loser<T>(&self, first: T, second: T) -> (T, T) {
        match self.winner {
            Seat::First => (first, second),
            Seat::Second => (second, first),
        }
    }
}

/// Decides duels between clashing players.
///
/// Implementations must always be decisive: tie handling is entirely the
/// resolver's business.
pub trait DuelResolver {
    /// Decide a duel between `first` and `second`.
    ///
    /// Players are borrowed mutably so strategies may keep state between
    /// throws. Resolvers must not move the players.
    fn resolve(
        &mut self,
        first: &mut dyn Player,
        second: &mut dyn Player,
        matrix: &OutcomeMatrix,
    ) -> DuelOutcome;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_throw_order_matches_matrix() {
        for (i, throw) in Throw::ALL.iter().enumerate() {
            assert_eq!(throw.index(), i);
        }
        assert_eq!(Throw::Scissors.to_string(), "scissors");
    }

    #[test]
    fn test_winner_and_loser() {
        let first_wins = DuelOutcome { winner: Seat::First, throws: 1 };
        assert_eq!(first_wins.winner_and_loser(3, 8), (3, 8));

        let second_wins = DuelOutcome { winner: Seat::Second, throws: 2 };
        assert_eq!(second_wins.winner_and_loser(3, 8), (8, 3));
    }

    #[test]
    fn test_throw_serde() {
        let json = serde_json::to_string(&Throw::Paper).unwrap();
        assert_eq!(json, "\"paper\"");
        let back: Throw = serde_json::from_str("\"scissors\"").unwrap();
        assert_eq!(back, Throw::Scissors);
    }
}
