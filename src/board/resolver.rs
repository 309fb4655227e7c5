//! Conflict resolution after a move.
//!
//! After any player moves, the board may have players on hazard entries or
//! several players on one square. `ConflictResolver` iterates to a fixed
//! point:
//!
//! 1. **Hazard pass**: each player, in turn order, on a hazard entry is
//!    teleported once by `exit - entry`. A chained hazard waits for the
//!    next pass.
//! 2. **Clash check**: registry entries other than the start square,
//!    compared against their distinct count.
//! 3. **Duel pass**: every ordered pair `(i, j)` of players, self-pairs and
//!    both orientations included, is tested with the clash predicate. A
//!    clashing pair duels; the winner moves `+10`, the loser `-10`, the
//!    clock advances by the duel time and a hazard pass runs before the
//!    next pair is tested.
//! 4. Repeat until there is no clash and nobody stands on a hazard entry.
//!
//! Nothing guarantees termination: hazards can funnel duellists back onto
//! one square forever. The optional pass ceiling turns that into
//! `BoardError::LivenessExceeded`.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::core::{BoardConfig, BoardError, MoveCause};
use crate::duel::DuelResolver;

use super::state::{Board, BoardEvent};

/// Squares the duel winner moves forward.
pub const DUEL_BONUS: i64 = 10;

/// Squares the duel loser moves back.
pub const DUEL_PENALTY: i64 = 10;

/// What one resolution did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionSummary {
    /// Passes that found something to resolve.
    pub passes: u32,
    /// Hazard teleports applied.
    pub teleports: u32,
    /// Duels fought.
    pub duels: u32,
}

impl ResolutionSummary {
    /// Fold another summary into this one.
    pub fn absorb(&mut self, other: ResolutionSummary) {
        self.passes += other.passes;
        self.teleports += other.teleports;
        self.duels += other.duels;
    }
}

/// Fixed-point hazard and duel resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConflictResolver {
    max_passes: Option<u32>,
}

impl ConflictResolver {
    /// Create a resolver with an optional pass ceiling.
    #[must_use]
    pub const fn new(max_passes: Option<u32>) -> Self {
        Self { max_passes }
    }

    /// Create a resolver with the board's configured ceiling.
    #[must_use]
    pub fn from_config(config: &BoardConfig) -> Self {
        Self::new(config.max_resolution_passes)
    }

    /// Resolve hazards and clashes until the board is stable.
    ///
    /// On success no two players share a non-start square and nobody
    /// stands on a hazard entry.
    pub fn resolve<R>(&self, board: &mut Board, duels: &mut R) -> Result<ResolutionSummary, BoardError>
    where
        R: DuelResolver + ?Sized,
    {
        let mut summary = ResolutionSummary::default();
        board.refresh_registry();

        loop {
            summary.teleports += Self::hazard_pass(board);

            let clash = board.has_clash();
            if !clash && !board.on_hazard() {
                return Ok(summary);
            }

            if let Some(max) = self.max_passes {
                if summary.passes >= max {
                    return Err(BoardError::LivenessExceeded {
                        passes: summary.passes,
                        positions: board.registry().to_vec(),
                    });
                }
            }
            summary.passes += 1;
            trace!(pass = summary.passes, clash, registry = ?board.registry(), "resolution pass");

            if clash {
                Self::duel_pass(board, duels, &mut summary);
            }
        }
    }

    /// Teleport every player standing on a hazard entry, at most once each.
    ///
    /// Returns the number of teleports.
    pub fn hazard_pass(board: &mut Board) -> u32 {
        let mut teleports = 0;

        for index in 0..board.player_count() {
            let from = board.players()[index].position();
            let Some(hazard) = board.config().hazard_at(from) else {
                continue;
            };

            board.move_player(index, hazard.delta(), MoveCause::Hazard);
            board.refresh_registry();
            teleports += 1;

            let player = board.players()[index].id();
            let to = board.players()[index].position();
            debug!(%player, from, to, "hazard teleport");
            board.record(BoardEvent::Teleport {
                turn: board.turn_count(),
                player,
                from,
                to,
            });
        }

        teleports
    }

    /// Test every ordered pair and duel the clashing ones.
    fn duel_pass<R>(board: &mut Board, duels: &mut R, summary: &mut ResolutionSummary)
    where
        R: DuelResolver + ?Sized,
    {
        let count = board.player_count();
        let matrix = board.config().outcome_matrix;
        let duel_time = board.config().duel_time;

        for first in 0..count {
            for second in 0..count {
                // Self-pairs never clash; the index check keeps pair_mut sound
                // even for a player whose predicate ignores identity
                if first == second || !board.clashes(first, second) {
                    continue;
                }

                let square = board.players()[first].position();
                let outcome = {
                    let (a, b) = board.pair_mut(first, second);
                    duels.resolve(a, b, &matrix)
                };
                let (winner, loser) = outcome.winner_and_loser(first, second);

                board.move_player(winner, DUEL_BONUS, MoveCause::DuelWin);
                board.move_player(loser, -DUEL_PENALTY, MoveCause::DuelLoss);
                board.refresh_registry();
                board.advance_clock(duel_time);
                summary.duels += 1;

                let winner = board.players()[winner].id();
                let loser = board.players()[loser].id();
                debug!(square, %winner, %loser, throws = outcome.throws, "duel");
                board.record(BoardEvent::Duel {
                    turn: board.turn_count(),
                    square,
                    winner,
                    loser,
                    throws: outcome.throws,
                });

                summary.teleports += Self::hazard_pass(board);
            }
        }
    }
}
