//! # rust-ladders
//!
//! A snakes-and-ladders race where players who land on the same square
//! duel for it: the winner moves ten squares on, the loser ten back and a
//! drink down.
//!
//! ## Design Principles
//!
//! 1. **Per-action resolution**: after every single move the board is
//!    resolved to a fixed point before the next player rolls.
//!
//! 2. **Capabilities at the seams**: players, dice and duel resolution are
//!    traits (`Player`, `DiceSource`, `DuelResolver`). The board only
//!    depends on their contracts.
//!
//! 3. **Legacy behaviour behind flags**: coarse winner detection and the
//!    stale registry reset on `add_player` are kept by default and can be
//!    switched off through `Compat`.
//!
//! ## Modules
//!
//! - `core`: Player ids and the `Player` trait, configuration, RNG and dice, errors
//! - `duel`: Duel resolution (rock-paper-scissors)
//! - `strategy`: Automated throw strategies
//! - `board`: Board state, conflict resolution, turn engine, reports
//! - `simulation`: Playing a whole game from settings

pub mod core;
pub mod duel;
pub mod strategy;
pub mod board;
pub mod simulation;

// Re-export commonly used types
pub use crate::core::{
    PlayerId, Player, Racer, MoveCause, MoveContext,
    GameRng, DiceRoll, DiceSource,
    BoardConfig, Compat, DiceConfig, Hazard, OutcomeMatrix, PlayerSpec, Settings,
    BoardError, ConfigError, SettingsError,
};

pub use crate::duel::{DuelOutcome, DuelResolver, RockPaperScissors, Seat, Throw};

pub use crate::strategy::{
    ThrowStrategy, StrategyConfig,
    RandomThrows, FixedThrow, CyclingThrows, WeightedThrows,
};

pub use crate::board::{
    Board, BoardEvent, GameClock,
    ConflictResolver, ResolutionSummary,
    TurnEngine, TurnSummary,
    BoardReport, BoardSummary, PlayerReport,
};

pub use crate::simulation::{play_a_game, GameRecord, ReportFrequency};
