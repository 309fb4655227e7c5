//! The board: state, conflict resolution and the turn engine.
//!
//! ## Example Usage
//!
//! ```
//! use rust_ladders::board::{Board, TurnEngine};
//! use rust_ladders::core::{BoardConfig, GameRng, PlayerId, Racer};
//! use rust_ladders::duel::RockPaperScissors;
//! use rust_ladders::strategy::RandomThrows;
//!
//! let config = BoardConfig::new(0, 100).with_hazard(4, 14).with_hazard(17, 7);
//! let mut board = Board::new(config).unwrap();
//! for i in 0..3 {
//!     let racer = Racer::new(PlayerId::new(i), format!("Racer {i}"), Box::new(RandomThrows));
//!     board.add_player(Box::new(racer)).unwrap();
//! }
//!
//! let rng = GameRng::new(42);
//! let mut engine = TurnEngine::new(rng.for_context("dice"), RockPaperScissors::new(rng.for_context("duel")));
//! engine.take_turn(&mut board).unwrap();
//!
//! assert_eq!(board.turn_count(), 1);
//! assert!(!board.has_clash());
//! ```

mod state;
mod resolver;
mod turn;
mod report;

pub use state::{Board, BoardEvent, GameClock};
pub use resolver::{ConflictResolver, ResolutionSummary, DUEL_BONUS, DUEL_PENALTY};
pub use turn::{TurnEngine, TurnSummary};
pub use report::{BoardReport, BoardSummary, PlayerReport};
