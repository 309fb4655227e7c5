//! Error types.
//!
//! The taxonomy is shallow: configuration problems are fatal at
//! construction, and the only runtime failure the board raises itself is
//! the resolution pass ceiling.

use std::path::PathBuf;

use super::player::PlayerId;

/// Malformed or inconsistent board configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("dice count must be at least 1")]
    NoDice,

    #[error("dice must have at least 1 side")]
    NoSides,

    #[error("dice bias has {got} weights but the dice have {sides} sides")]
    BiasLength { sides: u32, got: usize },

    #[error("dice bias weights must be non-negative and not all zero")]
    InvalidBias,

    #[error("end square {end} must lie beyond start square {start}")]
    EmptyTrack { start: i64, end: i64 },

    #[error("hazard on square {0} leads back to itself")]
    DegenerateHazard(i64),

    #[error("more than one hazard starts on square {0}")]
    DuplicateHazard(i64),

    #[error("hazard on square {0} is part of a hazard cycle")]
    HazardCycle(i64),

    #[error("outcome matrix entry [{row}][{col}] is {value}, expected -1, 0 or 1")]
    InvalidOutcome { row: usize, col: usize, value: i8 },

    #[error("resolution pass ceiling must be at least 1")]
    ZeroPassCeiling,

    #[error("invalid throw strategy: {0}")]
    InvalidStrategy(&'static str),

    #[error("settings list no players")]
    NoPlayers,

    #[error("{0} players listed, at most 255 supported")]
    TooManyPlayers(usize),
}

/// Failures raised while driving a board.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("board has no players")]
    NoPlayers,

    #[error("{0} is already on the board")]
    DuplicatePlayer(PlayerId),

    /// The fixed point was not reached within the configured pass ceiling.
    #[error("conflicts unresolved after {passes} passes, positions {positions:?}")]
    LivenessExceeded { passes: u32, positions: Vec<i64> },
}

/// Failures loading settings or running a game from them.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("failed to read settings from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid settings JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Board(#[from] BoardError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_messages() {
        let err = ConfigError::BiasLength { sides: 6, got: 4 };
        assert_eq!(err.to_string(), "dice bias has 4 weights but the dice have 6 sides");

        let err = ConfigError::EmptyTrack { start: 10, end: 5 };
        assert_eq!(err.to_string(), "end square 5 must lie beyond start square 10");
    }

    #[test]
    fn test_board_error_wraps_config_transparently() {
        let err: BoardError = ConfigError::DuplicateHazard(14).into();
        assert_eq!(err.to_string(), "more than one hazard starts on square 14");
    }

    #[test]
    fn test_liveness_message_lists_positions() {
        let err = BoardError::LivenessExceeded {
            passes: 3,
            positions: vec![5, 5],
        };
        assert_eq!(err.to_string(), "conflicts unresolved after 3 passes, positions [5, 5]");
    }
}
