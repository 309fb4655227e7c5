//! Board and game configuration.
//!
//! Configuration is static: it is validated once when a board is built and
//! never re-read. The JSON layout accepts the legacy key names
//! (`end_number`, `snakes_and_ladders`, `rps_matrix`, ...) through serde
//! aliases so old settings files keep loading.

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::error::{ConfigError, SettingsError};
use crate::duel::Throw;
use crate::strategy::StrategyConfig;

/// Shape of the dice rolled each action.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DiceConfig {
    /// Number of dice rolled and summed.
    #[serde(alias = "number_of_dice")]
    pub count: u32,

    /// Faces per die, numbered `1..=sides`.
    #[serde(alias = "number_of_sides")]
    pub sides: u32,

    /// Optional relative weight per face. `None` means a fair die.
    #[serde(default)]
    pub bias: Option<Vec<f32>>,
}

impl DiceConfig {
    /// Create a fair dice configuration.
    #[must_use]
    pub fn new(count: u32, sides: u32) -> Self {
        Self {
            count,
            sides,
            bias: None,
        }
    }

    /// Weight the faces of every die.
    #[must_use]
    pub fn with_bias(mut self, weights: Vec<f32>) -> Self {
        self.bias = Some(weights);
        self
    }

    /// Check the configuration is rollable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.count == 0 {
            return Err(ConfigError::NoDice);
        }
        if self.sides == 0 {
            return Err(ConfigError::NoSides);
        }
        if let Some(weights) = &self.bias {
            if weights.len() != self.sides as usize {
                return Err(ConfigError::BiasLength {
                    sides: self.sides,
                    got: weights.len(),
                });
            }
            let total: f32 = weights.iter().sum();
            if weights.iter().any(|w| !w.is_finite() || *w < 0.0) || total <= 0.0 {
                return Err(ConfigError::InvalidBias);
            }
        }
        Ok(())
    }
}

impl Default for DiceConfig {
    fn default() -> Self {
        Self::new(1, 6)
    }
}

/// A snake or ladder: landing on `entry` sends the player to `exit`.
///
/// Serialized as a two-element array `[entry, exit]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "(i64, i64)", into = "(i64, i64)")]
pub struct Hazard {
    pub entry: i64,
    pub exit: i64,
}

impl Hazard {
    /// Create a hazard.
    #[must_use]
    pub const fn new(entry: i64, exit: i64) -> Self {
        Self { entry, exit }
    }

    /// The move delta that teleports a player from `entry` to `exit`.
    #[must_use]
    pub const fn delta(self) -> i64 {
        self.exit - self.entry
    }

    /// Ladders go up, snakes go down.
    #[must_use]
    pub const fn is_ladder(self) -> bool {
        self.exit > self.entry
    }
}

impl From<(i64, i64)> for Hazard {
    fn from((entry, exit): (i64, i64)) -> Self {
        Self { entry, exit }
    }
}

impl From<Hazard> for (i64, i64) {
    fn from(h: Hazard) -> Self {
        (h.entry, h.exit)
    }
}

/// Duel outcome table.
///
/// `matrix[row][col]` is the result for a player throwing `row` against an
/// opponent throwing `col`: `1` win, `-1` loss, `0` tie. Rows and columns
/// are ordered rock, paper, scissors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OutcomeMatrix(pub [[i8; 3]; 3]);

impl OutcomeMatrix {
    /// Standard rock-paper-scissors.
    pub const STANDARD: Self = Self([[0, -1, 1], [1, 0, -1], [-1, 1, 0]]);

    /// Result for `ours` against `theirs`, from our side.
    #[must_use]
    pub fn outcome(&self, ours: Throw, theirs: Throw) -> i8 {
        self.0[ours.index()][theirs.index()]
    }

    /// Check every entry is `-1`, `0` or `1`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (row, cols) in self.0.iter().enumerate() {
            for (col, &value) in cols.iter().enumerate() {
                if !(-1..=1).contains(&value) {
                    return Err(ConfigError::InvalidOutcome { row, col, value });
                }
            }
        }
        Ok(())
    }
}

impl Default for OutcomeMatrix {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// Switches that keep legacy behaviour which is probably unintended.
///
/// Both default to `true`. Turning one off selects the obvious fix.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Compat {
    /// `check_for_winners` returns every player once anyone reaches the end.
    /// When `false`, only the players on the end square are returned.
    pub coarse_winners: bool,

    /// `add_player` resets the registry to zeros instead of reading positions.
    /// When `false`, the registry is refreshed from live positions.
    pub stale_registry_on_add: bool,
}

impl Default for Compat {
    fn default() -> Self {
        Self {
            coarse_winners: true,
            stale_registry_on_add: true,
        }
    }
}

fn default_pass_ceiling() -> Option<u32> {
    Some(BoardConfig::DEFAULT_PASS_CEILING)
}

/// Static board configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoardConfig {
    /// Start square. Players may stack here without clashing.
    #[serde(default, alias = "start_number")]
    pub start_square: i64,

    /// Winning square.
    #[serde(alias = "end_number")]
    pub end_square: i64,

    /// Snakes and ladders, checked in this order.
    #[serde(default, alias = "snakes_and_ladders")]
    pub hazards: Vec<Hazard>,

    /// Seconds added per player action.
    #[serde(alias = "turn_time_per_person")]
    pub turn_time: u64,

    /// Seconds added per duel.
    #[serde(alias = "rps_time")]
    pub duel_time: u64,

    /// Dice rolled each action.
    #[serde(alias = "dice_config")]
    pub dice: DiceConfig,

    /// Passed unmodified to the duel resolver.
    #[serde(default, alias = "rps_matrix")]
    pub outcome_matrix: OutcomeMatrix,

    /// Ceiling on conflict-resolution passes per action. `None` is unbounded.
    #[serde(default = "default_pass_ceiling")]
    pub max_resolution_passes: Option<u32>,

    /// Legacy behaviour switches.
    #[serde(default)]
    pub compat: Compat,
}

impl BoardConfig {
    /// Default ceiling on conflict-resolution passes.
    pub const DEFAULT_PASS_CEILING: u32 = 10_000;

    /// Create a configuration with the given bounds and defaults elsewhere.
    #[must_use]
    pub fn new(start_square: i64, end_square: i64) -> Self {
        Self {
            start_square,
            end_square,
            ..Self::default()
        }
    }

    /// Add a snake or ladder.
    #[must_use]
    pub fn with_hazard(mut self, entry: i64, exit: i64) -> Self {
        self.hazards.push(Hazard::new(entry, exit));
        self
    }

    /// Set the per-action and per-duel time costs.
    #[must_use]
    pub fn with_times(mut self, turn_time: u64, duel_time: u64) -> Self {
        self.turn_time = turn_time;
        self.duel_time = duel_time;
        self
    }

    /// Set the dice.
    #[must_use]
    pub fn with_dice(mut self, dice: DiceConfig) -> Self {
        self.dice = dice;
        self
    }

    /// Set the duel outcome table.
    #[must_use]
    pub fn with_outcome_matrix(mut self, matrix: OutcomeMatrix) -> Self {
        self.outcome_matrix = matrix;
        self
    }

    /// Set the resolution pass ceiling (`None` for unbounded).
    #[must_use]
    pub fn with_max_resolution_passes(mut self, passes: Option<u32>) -> Self {
        self.max_resolution_passes = passes;
        self
    }

    /// Set the legacy behaviour switches.
    #[must_use]
    pub fn with_compat(mut self, compat: Compat) -> Self {
        self.compat = compat;
        self
    }

    /// Find the hazard starting on `square`, if any.
    #[must_use]
    pub fn hazard_at(&self, square: i64) -> Option<Hazard> {
        self.hazards.iter().copied().find(|h| h.entry == square)
    }

    /// True iff following hazard exits from `entry` returns to `entry`.
    ///
    /// Entries are unique, so a chain longer than the hazard list has
    /// already looped.
    fn leads_back_to(&self, entry: i64) -> bool {
        let mut square = entry;
        for _ in 0..self.hazards.len() {
            match self.hazard_at(square) {
                Some(hazard) if hazard.exit == entry => return true,
                Some(hazard) => square = hazard.exit,
                None => return false,
            }
        }
        false
    }

    /// Validate the whole configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.dice.validate()?;
        self.outcome_matrix.validate()?;

        if self.end_square <= self.start_square {
            return Err(ConfigError::EmptyTrack {
                start: self.start_square,
                end: self.end_square,
            });
        }

        for (i, hazard) in self.hazards.iter().enumerate() {
            if hazard.entry == hazard.exit {
                return Err(ConfigError::DegenerateHazard(hazard.entry));
            }
            if self.hazards[..i].iter().any(|h| h.entry == hazard.entry) {
                return Err(ConfigError::DuplicateHazard(hazard.entry));
            }
        }

        for hazard in &self.hazards {
            if self.leads_back_to(hazard.entry) {
                return Err(ConfigError::HazardCycle(hazard.entry));
            }
        }

        if self.max_resolution_passes == Some(0) {
            return Err(ConfigError::ZeroPassCeiling);
        }

        Ok(())
    }
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            start_square: 0,
            end_square: 100,
            hazards: Vec::new(),
            turn_time: 30,
            duel_time: 20,
            dice: DiceConfig::default(),
            outcome_matrix: OutcomeMatrix::STANDARD,
            max_resolution_passes: default_pass_ceiling(),
            compat: Compat::default(),
        }
    }
}

/// One seat in a game loaded from settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerSpec {
    pub name: String,
    #[serde(default)]
    pub strategy: StrategyConfig,
}

impl PlayerSpec {
    /// Create a player spec.
    pub fn new(name: impl Into<String>, strategy: StrategyConfig) -> Self {
        Self {
            name: name.into(),
            strategy,
        }
    }
}

fn default_max_turns() -> u32 {
    Settings::DEFAULT_MAX_TURNS
}

/// Everything needed to play one game.
///
/// Board keys sit at the top level next to `players`, `seed` and
/// `max_turns`, matching the legacy flat layout.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(flatten)]
    pub board: BoardConfig,

    pub players: Vec<PlayerSpec>,

    /// Seed for dice and duel randomness.
    #[serde(default)]
    pub seed: u64,

    /// Stop after this many rounds even without a winner.
    #[serde(default = "default_max_turns")]
    pub max_turns: u32,
}

#[derive(Deserialize)]
struct SettingsFile {
    settings: Settings,
}

impl Settings {
    /// Default round cap for a simulated game.
    pub const DEFAULT_MAX_TURNS: u32 = 1_000;

    /// Create settings for a board and players.
    #[must_use]
    pub fn new(board: BoardConfig, players: Vec<PlayerSpec>) -> Self {
        Self {
            board,
            players,
            seed: 0,
            max_turns: Self::DEFAULT_MAX_TURNS,
        }
    }

    /// Set the seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the round cap.
    #[must_use]
    pub fn with_max_turns(mut self, max_turns: u32) -> Self {
        self.max_turns = max_turns;
        self
    }

    /// Parse settings from JSON wrapped in a `{"settings": {...}}` envelope.
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let file: SettingsFile = serde_json::from_str(json)?;
        file.settings.validate()?;
        Ok(file.settings)
    }

    /// Read and parse a settings file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Validate the board and the player list.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.board.validate()?;
        if self.players.is_empty() {
            return Err(ConfigError::NoPlayers);
        }
        if self.players.len() > usize::from(u8::MAX) {
            return Err(ConfigError::TooManyPlayers(self.players.len()));
        }
        Ok(())
    }
}
