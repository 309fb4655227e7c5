//! The board aggregate.
//!
//! ## Registry
//!
//! `registry[i]` caches `players[i].position()`. It is a cache with no
//! automatic invalidation: every path that moves a player must call
//! `refresh_registry()` before anything reads it. `registry_is_fresh()`
//! exists so tests can check that contract.
//!
//! ## Clock and turns
//!
//! `GameClock` only ever advances. `turn_count` counts completed rounds.

use im::Vector;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::core::{BoardConfig, BoardError, MoveCause, MoveContext, Player, PlayerId};

use super::report::{BoardReport, BoardSummary, PlayerReport};

/// Monotonic in-game clock.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameClock {
    elapsed_seconds: u64,
}

impl GameClock {
    /// A clock showing `elapsed_seconds`.
    #[must_use]
    pub const fn from_seconds(elapsed_seconds: u64) -> Self {
        Self { elapsed_seconds }
    }

    /// Seconds elapsed so far.
    #[must_use]
    pub fn elapsed_seconds(&self) -> u64 {
        self.elapsed_seconds
    }

    /// Minutes elapsed, rounded to one decimal place.
    #[must_use]
    pub fn minutes(&self) -> f64 {
        (self.elapsed_seconds as f64 / 60.0 * 10.0).round() / 10.0
    }

    /// Add time. Saturates rather than wrapping.
    pub fn advance(&mut self, seconds: u64) {
        self.elapsed_seconds = self.elapsed_seconds.saturating_add(seconds);
    }
}

/// Something that happened during conflict resolution.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoardEvent {
    /// A player landed on a hazard entry and was moved to its exit.
    Teleport {
        turn: u32,
        player: PlayerId,
        from: i64,
        to: i64,
    },
    /// Two players clashed on `square` and duelled.
    Duel {
        turn: u32,
        square: i64,
        winner: PlayerId,
        loser: PlayerId,
        throws: u32,
    },
}

/// The race board: players in turn order plus derived state.
#[derive(Debug)]
pub struct Board {
    config: BoardConfig,
    players: Vec<Box<dyn Player>>,
    registry: Vec<i64>,
    clock: GameClock,
    turn_count: u32,
    history: Vector<BoardEvent>,
}

impl Board {
    /// Create an empty board from a validated configuration.
    pub fn new(config: BoardConfig) -> Result<Self, BoardError> {
        config.validate()?;
        Ok(Self {
            config,
            players: Vec::new(),
            registry: Vec::new(),
            clock: GameClock::default(),
            turn_count: 0,
            history: Vector::new(),
        })
    }

    // === Accessors ===

    /// The static configuration.
    #[must_use]
    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    /// Players in turn order.
    #[must_use]
    pub fn players(&self) -> &[Box<dyn Player>] {
        &self.players
    }

    /// Number of players.
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    /// Look up a player by id.
    #[must_use]
    pub fn player(&self, id: PlayerId) -> Option<&dyn Player> {
        self.players.iter().find(|p| p.id() == id).map(|p| &**p)
    }

    /// The cached positions. Only meaningful right after a refresh.
    #[must_use]
    pub fn registry(&self) -> &[i64] {
        &self.registry
    }

    /// Completed rounds.
    #[must_use]
    pub fn turn_count(&self) -> u32 {
        self.turn_count
    }

    /// The in-game clock.
    #[must_use]
    pub fn clock(&self) -> GameClock {
        self.clock
    }

    /// Seconds of in-game time elapsed.
    #[must_use]
    pub fn elapsed_seconds(&self) -> u64 {
        self.clock.elapsed_seconds()
    }

    /// Teleports and duels in the order they happened.
    #[must_use]
    pub fn history(&self) -> &Vector<BoardEvent> {
        &self.history
    }

    /// Drinks consumed by all players.
    #[must_use]
    pub fn total_drinks(&self) -> u32 {
        self.players.iter().map(|p| p.drinks()).sum()
    }

    // === Setup ===

    /// Attach a player at the end of the turn order.
    ///
    /// With `compat.stale_registry_on_add` (the default) the registry is
    /// reset to zeros sized to the new player count, *not* read from live
    /// positions. Callers must refresh before relying on it.
    pub fn add_player(&mut self, player: Box<dyn Player>) -> Result<PlayerId, BoardError> {
        let id = player.id();
        if self.players.iter().any(|p| p.id() == id) {
            return Err(BoardError::DuplicatePlayer(id));
        }

        self.players.push(player);
        if self.config.compat.stale_registry_on_add {
            self.registry = vec![0; self.players.len()];
        } else {
            self.refresh_registry();
        }
        Ok(id)
    }

    // === Registry ===

    /// Recompute the registry from live positions.
    pub fn refresh_registry(&mut self) {
        self.registry.clear();
        self.registry.extend(self.players.iter().map(|p| p.position()));
    }

    /// True iff the registry matches every player's live position.
    #[must_use]
    pub fn registry_is_fresh(&self) -> bool {
        self.registry.len() == self.players.len()
            && self
                .registry
                .iter()
                .zip(&self.players)
                .all(|(&cached, p)| cached == p.position())
    }

    /// True iff the registry holds a repeated square other than the start.
    #[must_use]
    pub fn has_clash(&self) -> bool {
        let start = self.config.start_square;
        let occupied: Vec<i64> = self.registry.iter().copied().filter(|&s| s != start).collect();
        let distinct: FxHashSet<i64> = occupied.iter().copied().collect();
        occupied.len() > distinct.len()
    }

    /// True iff some registry entry sits on a hazard entry.
    #[must_use]
    pub fn on_hazard(&self) -> bool {
        self.registry.iter().any(|&s| self.config.hazard_at(s).is_some())
    }

    /// Whether player `a` clashes with player `b`, by turn-order index.
    #[must_use]
    pub fn clashes(&self, a: usize, b: usize) -> bool {
        self.players[a].clash_with(&*self.players[b], self.config.start_square)
    }

    // === Queries ===

    /// Check whether anyone has reached the end square.
    ///
    /// With `compat.coarse_winners` (the default) this returns *every*
    /// player as soon as the end square appears in the registry. Otherwise
    /// only the players standing on it.
    #[must_use]
    pub fn check_for_winners(&self) -> Option<Vec<PlayerId>> {
        let end = self.config.end_square;
        if !self.registry.contains(&end) {
            return None;
        }

        let winners = if self.config.compat.coarse_winners {
            self.players.iter().map(|p| p.id()).collect()
        } else {
            self.players
                .iter()
                .zip(&self.registry)
                .filter(|&(_, &square)| square == end)
                .map(|(p, _)| p.id())
                .collect()
        };
        Some(winners)
    }

    /// Snapshot of every player's live position.
    #[must_use]
    pub fn info_on_players(&self) -> FxHashMap<PlayerId, i64> {
        self.players.iter().map(|p| (p.id(), p.position())).collect()
    }

    /// Structured snapshot for reporting. Players are keyed by name.
    #[must_use]
    pub fn generate_report(&self) -> BoardReport {
        let players: BTreeMap<String, PlayerReport> = self
            .players
            .iter()
            .map(|p| {
                (
                    p.name().to_string(),
                    PlayerReport {
                        position: p.position(),
                        drinks: p.drinks(),
                    },
                )
            })
            .collect();

        BoardReport {
            board: BoardSummary {
                turns: self.turn_count,
                game_seconds: self.clock.elapsed_seconds(),
                drinks: self.total_drinks(),
            },
            players,
        }
    }

    // === Mutation (turn engine and conflict resolver only) ===

    /// Move the player at `index`. Leaves the registry stale.
    pub(crate) fn move_player(&mut self, index: usize, delta: i64, cause: MoveCause) {
        let context = MoveContext {
            cause,
            start_square: self.config.start_square,
            end_square: self.config.end_square,
            turn: self.turn_count,
        };
        self.players[index].move_by(delta, &context);
    }

    /// Mutable access to two distinct players at once.
    pub(crate) fn pair_mut(&mut self, a: usize, b: usize) -> (&mut dyn Player, &mut dyn Player) {
        assert_ne!(a, b, "A player cannot duel itself");
        if a < b {
            let (low, high) = self.players.split_at_mut(b);
            (&mut *low[a], &mut *high[0])
        } else {
            let (low, high) = self.players.split_at_mut(a);
            (&mut *high[0], &mut *low[b])
        }
    }

    pub(crate) fn advance_clock(&mut self, seconds: u64) {
        self.clock.advance(seconds);
    }

    pub(crate) fn advance_turn(&mut self) {
        self.turn_count += 1;
    }

    pub(crate) fn record(&mut self, event: BoardEvent) {
        self.history.push_back(event);
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        writeln!(f, "Current state of board:")?;
        writeln!(f, "-----------------------")?;
        for p in &self.players {
            writeln!(
                f,
                "{} is on square {} having had {} drinks",
                p.name(),
                p.position(),
                p.drinks()
            )?;
        }
        writeln!(f, "-----------------------")?;
        writeln!(f, "Currently on turn {}", self.turn_count)?;
        writeln!(f, "Game has taken {:.1} minutes so far", self.clock.minutes())?;
        write!(f, "{} drinks have been consumed in total", self.total_drinks())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Compat, Racer};
    use crate::duel::Throw;
    use crate::strategy::FixedThrow;

    fn racer(id: u8, square: i64) -> Box<dyn Player> {
        Box::new(
            Racer::new(PlayerId::new(id), format!("p{id}"), Box::new(FixedThrow(Throw::Rock)))
                .starting_at(square),
        )
    }

    fn board_with(positions: &[i64]) -> Board {
        let mut board = Board::new(BoardConfig::new(0, 100).with_hazard(5, 9)).unwrap();
        for (i, &square) in positions.iter().enumerate() {
            board.add_player(racer(i as u8, square)).unwrap();
        }
        board.refresh_registry();
        board
    }

    #[test]
    fn test_new_board_is_empty() {
        let board = Board::new(BoardConfig::default()).unwrap();
        assert_eq!(board.player_count(), 0);
        assert_eq!(board.turn_count(), 0);
        assert_eq!(board.elapsed_seconds(), 0);
        assert!(board.registry().is_empty());
        assert!(board.check_for_winners().is_none());
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let err = Board::new(BoardConfig::new(0, 100).with_hazard(3, 3)).unwrap_err();
        assert!(matches!(err, BoardError::Config(_)));
    }

    #[test]
    fn test_add_player_rejects_duplicate_id() {
        let mut board = board_with(&[0]);
        let err = board.add_player(racer(0, 0)).unwrap_err();
        assert_eq!(err, BoardError::DuplicatePlayer(PlayerId::new(0)));
    }

    #[test]
    fn test_add_player_resets_registry_to_zeros() {
        let mut board = board_with(&[12, 30]);
        assert_eq!(board.registry(), &[12, 30]);

        board.add_player(racer(2, 44)).unwrap();
        assert_eq!(board.registry(), &[0, 0, 0]);
        assert!(!board.registry_is_fresh());

        board.refresh_registry();
        assert_eq!(board.registry(), &[12, 30, 44]);
        assert!(board.registry_is_fresh());
    }

    #[test]
    fn test_add_player_refreshes_without_compat() {
        let config = BoardConfig::new(0, 100).with_compat(Compat {
            stale_registry_on_add: false,
            ..Compat::default()
        });
        let mut board = Board::new(config).unwrap();
        board.add_player(racer(0, 12)).unwrap();
        board.add_player(racer(1, 30)).unwrap();
        assert_eq!(board.registry(), &[12, 30]);
    }

    #[test]
    fn test_clash_ignores_start_square() {
        assert!(!board_with(&[0, 0, 0]).has_clash());
        assert!(!board_with(&[0, 3, 4]).has_clash());
        assert!(board_with(&[0, 4, 4]).has_clash());
        assert!(board_with(&[-2, 7, -2]).has_clash());
    }

    #[test]
    fn test_clashes_by_index() {
        let board = board_with(&[4, 4, 6]);
        assert!(board.clashes(0, 1));
        assert!(board.clashes(1, 0));
        assert!(!board.clashes(0, 0));
        assert!(!board.clashes(1, 2));
    }

    #[test]
    fn test_on_hazard() {
        assert!(board_with(&[1, 5]).on_hazard());
        assert!(!board_with(&[1, 9]).on_hazard());
    }

    #[test]
    fn test_coarse_winners_returns_everyone() {
        let board = board_with(&[100, 3, 7]);
        let winners = board.check_for_winners().unwrap();
        assert_eq!(winners, vec![PlayerId::new(0), PlayerId::new(1), PlayerId::new(2)]);
    }

    #[test]
    fn test_precise_winners_without_compat() {
        let config = BoardConfig::new(0, 100).with_compat(Compat {
            coarse_winners: false,
            ..Compat::default()
        });
        let mut board = Board::new(config).unwrap();
        board.add_player(racer(0, 3)).unwrap();
        board.add_player(racer(1, 100)).unwrap();
        board.refresh_registry();

        assert_eq!(board.check_for_winners(), Some(vec![PlayerId::new(1)]));
    }

    #[test]
    fn test_overshooting_is_not_winning() {
        assert!(board_with(&[101, 99]).check_for_winners().is_none());
    }

    #[test]
    fn test_info_on_players() {
        let board = board_with(&[3, 8]);
        let info = board.info_on_players();
        assert_eq!(info.len(), 2);
        assert_eq!(info[&PlayerId::new(0)], 3);
        assert_eq!(info[&PlayerId::new(1)], 8);
    }

    #[test]
    fn test_pair_mut_both_orders() {
        let mut board = board_with(&[3, 8, 11]);
        let (a, b) = board.pair_mut(2, 0);
        assert_eq!((a.position(), b.position()), (11, 3));
        let (a, b) = board.pair_mut(0, 1);
        assert_eq!((a.position(), b.position()), (3, 8));
    }

    #[test]
    fn test_move_player_leaves_registry_stale() {
        let mut board = board_with(&[3, 8]);
        board.move_player(0, 4, MoveCause::Roll);
        assert!(!board.registry_is_fresh());
        assert_eq!(board.registry(), &[3, 8]);

        board.refresh_registry();
        assert_eq!(board.registry(), &[7, 8]);
    }

    #[test]
    fn test_clock_minutes() {
        let mut clock = GameClock::default();
        clock.advance(90);
        clock.advance(0);
        assert_eq!(clock.elapsed_seconds(), 90);
        assert!((clock.minutes() - 1.5).abs() < 1e-9);
        assert_eq!(GameClock::from_seconds(100).minutes(), 1.7);
    }

    #[test]
    fn test_display() {
        let mut board = board_with(&[3, 8]);
        board.advance_clock(90);
        board.advance_turn();
        let text = board.to_string();
        assert!(text.contains("p0 is on square 3 having had 0 drinks"));
        assert!(text.contains("Currently on turn 1"));
        assert!(text.contains("Game has taken 1.5 minutes so far"));
        assert_eq!(board.clock(), GameClock::from_seconds(90));
        assert!(text.ends_with("0 drinks have been consumed in total"));
    }
}
