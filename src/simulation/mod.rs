//! Playing a whole game from settings.
//!
//! `play_a_game` builds the board, racers, dice and duel resolver from a
//! `Settings` value, then takes rounds until someone reaches the end square
//! or the round cap is hit.
//!
//! Dice and duels draw from separate context streams of the settings seed,
//! so the same settings always replay the same game.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{info, warn};

use crate::board::{Board, BoardReport, TurnEngine};
use crate::core::{GameRng, PlayerId, Racer, Settings, SettingsError};
use crate::duel::RockPaperScissors;

/// How often a report is captured.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReportFrequency {
    /// After every round.
    #[default]
    Turn,
    /// Only once the game stops.
    End,
}

/// Outcome of a simulated game.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    /// Reports keyed by the round they were taken after.
    pub reports: BTreeMap<u32, BoardReport>,
    /// Names returned by the winner check, if the game finished.
    pub winners: Option<Vec<String>>,
    /// Rounds played.
    pub turns: u32,
}

impl GameRecord {
    /// True if someone reached the end square.
    #[must_use]
    pub fn finished(&self) -> bool {
        self.winners.is_some()
    }

    /// The last report taken.
    #[must_use]
    pub fn final_report(&self) -> Option<&BoardReport> {
        self.reports.values().next_back()
    }
}

/// The dice-and-duel engine used for simulated games.
pub type SimulationEngine = TurnEngine<GameRng, RockPaperScissors>;

/// Build a board with one racer per player spec, in listed order.
pub fn build_board(settings: &Settings) -> Result<Board, SettingsError> {
    settings.validate()?;

    let mut board = Board::new(settings.board.clone())?;
    for (id, spec) in PlayerId::all(settings.players.len()).zip(&settings.players) {
        let racer = Racer::new(id, spec.name.clone(), spec.strategy.build()?)
            .starting_at(settings.board.start_square);
        board.add_player(Box::new(racer))?;
    }
    board.refresh_registry();
    Ok(board)
}

/// Build the turn engine for a seed.
#[must_use]
pub fn build_engine(seed: u64) -> SimulationEngine {
    let rng = GameRng::new(seed);
    TurnEngine::new(rng.for_context("dice"), RockPaperScissors::new(rng.for_context("duel")))
}

/// Play a game to completion or to the round cap.
pub fn play_a_game(settings: &Settings, frequency: ReportFrequency) -> Result<GameRecord, SettingsError> {
    let mut board = build_board(settings)?;
    let mut engine = build_engine(settings.seed);
    let mut record = GameRecord::default();

    info!(players = board.player_count(), seed = settings.seed, "starting game");

    while board.turn_count() < settings.max_turns {
        engine.take_turn(&mut board)?;

        if frequency == ReportFrequency::Turn {
            record.reports.insert(board.turn_count(), board.generate_report());
        }

        if let Some(winners) = board.check_for_winners() {
            record.winners = Some(
                winners
                    .into_iter()
                    .filter_map(|id| board.player(id).map(|p| p.name().to_string()))
                    .collect(),
            );
            break;
        }
    }

    record.turns = board.turn_count();
    if frequency == ReportFrequency::End {
        record.reports.insert(board.turn_count(), board.generate_report());
    }

    if record.finished() {
        info!(turns = record.turns, elapsed_seconds = board.elapsed_seconds(), "game finished");
    } else {
        warn!(max_turns = settings.max_turns, "round cap reached without a winner");
    }

    Ok(record)
}
