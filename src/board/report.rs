//! Serializable board reports.
//!
//! The JSON shape is
//! `{"board": {"turns", "game_seconds", "drinks"}, "players": {name: {"position", "drinks"}}}`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::state::GameClock;

/// Board-wide totals.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSummary {
    /// Completed rounds.
    pub turns: u32,
    /// In-game seconds elapsed.
    pub game_seconds: u64,
    /// Drinks consumed by everyone.
    pub drinks: u32,
}

/// One player's line in a report.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerReport {
    pub position: i64,
    pub drinks: u32,
}

/// Snapshot of a board for display or export.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardReport {
    pub board: BoardSummary,
    /// Keyed by player name.
    pub players: BTreeMap<String, PlayerReport>,
}

impl BoardReport {
    /// Render as a JSON object.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

impl fmt::Display for BoardReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Turn {}", self.board.turns)?;
        for (name, player) in &self.players {
            writeln!(f, "  {name:<16} square {:>4}  drinks {:>3}", player.position, player.drinks)?;
        }
        let minutes = GameClock::from_seconds(self.board.game_seconds).minutes();
        write!(
            f,
            "  {:.1} minutes played, {} drinks in total",
            minutes, self.board.drinks
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_json_shape() {
        let mut report = BoardReport {
            board: BoardSummary {
                turns: 3,
                game_seconds: 270,
                drinks: 2,
            },
            ..BoardReport::default()
        };
        report.players.insert("Ann".into(), PlayerReport { position: 17, drinks: 2 });

        let value: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(value["board"]["turns"], 3);
        assert_eq!(value["board"]["game_seconds"], 270);
        assert_eq!(value["players"]["Ann"]["position"], 17);
        assert_eq!(value["players"]["Ann"]["drinks"], 2);
    }

    #[test]
    fn test_report_display() {
        let mut report = BoardReport {
            board: BoardSummary {
                turns: 2,
                game_seconds: 150,
                drinks: 1,
            },
            ..BoardReport::default()
        };
        report.players.insert("Bo".into(), PlayerReport { position: -3, drinks: 1 });

        let text = report.to_string();
        assert!(text.starts_with("Turn 2\n"));
        assert!(text.contains("Bo"));
        assert!(text.ends_with("2.5 minutes played, 1 drinks in total"));
    }

    #[test]
    fn test_report_minutes_match_clock() {
        for seconds in [0, 59, 100, 3_601] {
            let report = BoardReport {
                board: BoardSummary {
                    game_seconds: seconds,
                    ..BoardSummary::default()
                },
                ..BoardReport::default()
            };
            let minutes = format!("{:.1} minutes played", GameClock::from_seconds(seconds).minutes());
            assert!(report.to_string().contains(&minutes));
        }
    }
}
