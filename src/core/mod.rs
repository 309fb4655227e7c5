//! Core types: players, configuration, RNG and dice, errors.
//!
//! This module holds the building blocks the board is made of. Nothing in
//! here knows how a round is played.

pub mod player;
pub mod rng;
pub mod config;
pub mod error;

pub use player::{MoveCause, MoveContext, Player, PlayerId, Racer};
pub use rng::{DiceRoll, DiceSource, GameRng};
pub use config::{BoardConfig, Compat, DiceConfig, Hazard, OutcomeMatrix, PlayerSpec, Settings};
pub use error::{BoardError, ConfigError, SettingsError};
