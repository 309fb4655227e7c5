//! One round of play.
//!
//! Each player, in board order, pays the per-action time, rolls, moves and
//! then has the board resolved to a fixed point before the next player
//! rolls. Resolution is per action, never batched per round.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::core::{BoardError, DiceRoll, DiceSource, MoveCause, PlayerId};
use crate::duel::DuelResolver;

use super::resolver::{ConflictResolver, ResolutionSummary};
use super::state::Board;

/// What one round did.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnSummary {
    /// The round number just completed (1-based).
    pub turn: u32,
    /// Each player's roll, in turn order.
    pub rolls: Vec<(PlayerId, DiceRoll)>,
    /// Resolution work summed over all actions.
    pub resolution: ResolutionSummary,
}

/// Drives rounds on a board with a dice source and a duel resolver.
#[derive(Debug)]
pub struct TurnEngine<D, R> {
    dice: D,
    duels: R,
}

impl<D: DiceSource, R: DuelResolver> TurnEngine<D, R> {
    /// Create an engine.
    pub fn new(dice: D, duels: R) -> Self {
        Self { dice, duels }
    }

    /// The duel resolver.
    pub fn duels_mut(&mut self) -> &mut R {
        &mut self.duels
    }

    /// Play one full round.
    ///
    /// Fails with `NoPlayers` on an empty board, and propagates
    /// `LivenessExceeded` from conflict resolution. On failure the round is
    /// abandoned and the turn count is not advanced. Work already done in
    /// that round stays applied: the clock keeps the time charged so far,
    /// and earlier players' moves and duels are not rolled back.
    pub fn take_turn(&mut self, board: &mut Board) -> Result<TurnSummary, BoardError> {
        if board.player_count() == 0 {
            return Err(BoardError::NoPlayers);
        }

        let resolver = ConflictResolver::from_config(board.config());
        let mut summary = TurnSummary {
            turn: board.turn_count() + 1,
            ..TurnSummary::default()
        };

        for index in 0..board.player_count() {
            board.advance_clock(board.config().turn_time);

            let roll = self.dice.roll(&board.config().dice);
            board.move_player(index, roll.total(), MoveCause::Roll);
            board.refresh_registry();

            let player = board.players()[index].id();
            debug!(%player, roll = roll.total(), to = board.players()[index].position(), "rolled");

            let resolution = resolver.resolve(board, &mut self.duels)?;
            summary.resolution.absorb(resolution);
            summary.rolls.push((player, roll));
        }

        board.advance_turn();
        info!(
            turn = summary.turn,
            duels = summary.resolution.duels,
            teleports = summary.resolution.teleports,
            elapsed_seconds = board.elapsed_seconds(),
            "round complete"
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{BoardConfig, DiceConfig, GameRng, Player, Racer};
    use crate::duel::{RockPaperScissors, Throw};
    use crate::strategy::{FixedThrow, RandomThrows};

    /// Replays a fixed list of totals, one single-face roll each.
    #[derive(Debug)]
    struct Scripted(Vec<u32>, usize);

    impl DiceSource for Scripted {
        fn roll(&mut self, _dice: &DiceConfig) -> DiceRoll {
            let face = self.0[self.1 % self.0.len()];
            self.1 += 1;
            DiceRoll::from_faces(&[face])
        }
    }

    fn board(config: BoardConfig, players: usize) -> Board {
        let mut board = Board::new(config.with_times(30, 15)).unwrap();
        for i in 0..players {
            let racer = Racer::new(PlayerId::new(i as u8), format!("p{i}"), Box::new(FixedThrow(Throw::Rock)));
            board.add_player(Box::new(racer)).unwrap();
        }
        board
    }

    fn positions(board: &Board) -> Vec<i64> {
        board.players().iter().map(|p| p.position()).collect()
    }

    #[test]
    fn test_empty_board_is_rejected() {
        let mut board = board(BoardConfig::new(0, 100), 0);
        let mut engine = TurnEngine::new(GameRng::new(1), RockPaperScissors::new(GameRng::new(2)));
        assert_eq!(engine.take_turn(&mut board), Err(BoardError::NoPlayers));
        assert_eq!(board.turn_count(), 0);
    }

    #[test]
    fn test_round_moves_each_player_once() {
        let mut board = board(BoardConfig::new(0, 100), 3);
        let mut engine = TurnEngine::new(Scripted(vec![2, 3, 4], 0), RockPaperScissors::new(GameRng::new(2)));

        let summary = engine.take_turn(&mut board).unwrap();
        assert_eq!(summary.turn, 1);
        assert_eq!(summary.rolls.len(), 3);
        assert_eq!(positions(&board), vec![2, 3, 4]);
        assert_eq!(board.turn_count(), 1);
        assert_eq!(board.elapsed_seconds(), 90);
        assert!(board.registry_is_fresh());
    }

    #[test]
    fn test_resolution_runs_before_next_player_rolls() {
        // p0 lands on 3 and climbs to 20; p1 then rolls onto 3 as well
        // and must follow to 20 and duel there
        let config = BoardConfig::new(0, 100).with_hazard(3, 20);
        let mut board = board(config, 2);
        let mut engine = TurnEngine::new(Scripted(vec![3], 0), RockPaperScissors::new(GameRng::new(2)));

        let summary = engine.take_turn(&mut board).unwrap();
        assert_eq!(summary.resolution.teleports, 2);
        assert_eq!(summary.resolution.duels, 1);

        // Both throw rock: tie-break by coin, but the squares are fixed
        let mut squares = positions(&board);
        squares.sort_unstable();
        assert_eq!(squares, vec![10, 30]);
        assert_eq!(board.elapsed_seconds(), 2 * 30 + 15);
    }

    #[test]
    fn test_turn_count_ignores_duels() {
        let mut board = board(BoardConfig::new(0, 100), 4);
        let mut engine = TurnEngine::new(Scripted(vec![5], 0), RockPaperScissors::new(GameRng::new(9)));

        for round in 1..=5 {
            engine.take_turn(&mut board).unwrap();
            assert_eq!(board.turn_count(), round);
        }
    }

    #[test]
    fn test_random_game_stays_clash_free() {
        let config = BoardConfig::new(0, 100).with_hazard(4, 14).with_hazard(17, 7).with_hazard(28, 84);
        let mut board = Board::new(config).unwrap();
        for i in 0..4u8 {
            let racer = Racer::new(PlayerId::new(i), format!("p{i}"), Box::new(RandomThrows));
            board.add_player(Box::new(racer)).unwrap();
        }
        let mut engine = TurnEngine::new(GameRng::new(3), RockPaperScissors::new(GameRng::new(4)));

        for _ in 0..30 {
            engine.take_turn(&mut board).unwrap();
            assert!(!board.has_clash());
            assert!(!board.on_hazard());
            assert!(board.registry_is_fresh());
        }
    }
}
