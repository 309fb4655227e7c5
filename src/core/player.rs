//! Player identification and the `Player` capability.
//!
//! ## PlayerId
//!
//! Type-safe player identifier supporting 1-255 players.
//!
//! ## Player
//!
//! The board never owns a player's position: it asks the player to move and
//! reads the result back. Anything implementing `Player` can sit on a board,
//! which is how scripted players are injected in tests.
//!
//! ## Racer
//!
//! The built-in player: moves by whatever delta it is given, drinks when it
//! loses a duel, and delegates duel throws to a `ThrowStrategy`.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::rng::GameRng;
use crate::duel::Throw;
use crate::strategy::ThrowStrategy;

/// Player identifier supporting 1-255 players.
///
/// Player indices are 0-based: the first player is `PlayerId(0)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u8);

impl PlayerId {
    /// Create a new player ID.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Iterate over all player IDs for a game with `player_count` players.
    ///
    /// ```
    /// use rust_ladders::core::PlayerId;
    ///
    /// let players: Vec<_> = PlayerId::all(4).collect();
    /// assert_eq!(players.len(), 4);
    /// assert_eq!(players[3], PlayerId::new(3));
    /// ```
    pub fn all(player_count: usize) -> impl Iterator<Item = PlayerId> {
        (0..player_count as u8).map(PlayerId)
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Player {}", self.0)
    }
}

/// Why a player is being moved.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveCause {
    /// Dice roll at the start of the player's action.
    Roll,
    /// Snake or ladder teleport.
    Hazard,
    /// Bonus move for winning a duel.
    DuelWin,
    /// Penalty move for losing a duel.
    DuelLoss,
}

/// Read-only board context handed to `Player::move_by`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MoveContext {
    /// What triggered the move.
    pub cause: MoveCause,
    /// The board's start square (exempt from clashes).
    pub start_square: i64,
    /// The winning square.
    pub end_square: i64,
    /// Completed rounds so far.
    pub turn: u32,
}

/// A participant in the race.
///
/// Implementations own their position. The board reads it back through
/// `position()` after every `move_by` and never caches it without a refresh.
pub trait Player: fmt::Debug {
    /// Stable identity, unique on a board.
    fn id(&self) -> PlayerId;

    /// Display name used in reports.
    fn name(&self) -> &str;

    /// Current square. Not clamped to the board bounds.
    fn position(&self) -> i64;

    /// Move by `delta` squares.
    fn move_by(&mut self, delta: i64, context: &MoveContext);

    /// Drinks consumed so far.
    fn drinks(&self) -> u32;

    /// Pick a throw for one round of a duel.
    fn choose_throw(&mut self, rng: &mut GameRng) -> Throw;

    /// True iff `other` is a different player on the same non-start square.
    fn clash_with(&self, other: &dyn Player, start_square: i64) -> bool {
        self.id() != other.id()
            && self.position() == other.position()
            && self.position() != start_square
    }
}

/// The built-in player.
#[derive(Debug)]
pub struct Racer {
    id: PlayerId,
    name: String,
    position: i64,
    drinks: u32,
    strategy: Box<dyn ThrowStrategy>,
}

impl Racer {
    /// Create a racer on square 0.
    pub fn new(id: PlayerId, name: impl Into<String>, strategy: Box<dyn ThrowStrategy>) -> Self {
        Self {
            id,
            name: name.into(),
            position: 0,
            drinks: 0,
            strategy,
        }
    }

    /// Place the racer on a given square.
    #[must_use]
    pub fn starting_at(mut self, square: i64) -> Self {
        self.position = square;
        self
    }
}

impl Player for Racer {
    fn id(&self) -> PlayerId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn position(&self) -> i64 {
        self.position
    }

    fn move_by(&mut self, delta: i64, context: &MoveContext) {
        self.position += delta;
        if context.cause == MoveCause::DuelLoss {
            self.drinks += 1;
        }
    }

    fn drinks(&self) -> u32 {
        self.drinks
    }

    fn choose_throw(&mut self, rng: &mut GameRng) -> Throw {
        self.strategy.choose(rng)
    }
}

impl fmt::Display for Racer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} is on square {} having had {} drinks",
            self.name, self.position, self.drinks
        )
    }
}
