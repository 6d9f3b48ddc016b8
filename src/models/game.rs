//! Uploaded game film model.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Numeric identifier of a game film, assigned by the play record store.
pub type FilmId = u64;

/// One uploaded game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameFilm {
    /// Store-assigned identifier
    pub id: FilmId,

    /// Opponent name. Compared byte-for-byte when grouping games, so
    /// "Rivals" and "rivals" are two different opponents.
    pub opponent: String,

    /// Date the game was played
    pub game_date: NaiveDate,

    /// Which side of the ball the film was logged for (e.g. "offense")
    #[serde(default)]
    pub team: Option<String>,
}

impl GameFilm {
    /// Create a new GameFilm.
    pub fn new(id: FilmId, opponent: impl Into<String>, game_date: NaiveDate) -> Self {
        Self {
            id,
            opponent: opponent.into(),
            game_date,
            team: None,
        }
    }

    /// Builder method to set the analyzing-team designation.
    pub fn with_team(mut self, team: impl Into<String>) -> Self {
        self.team = Some(team.into());
        self
    }

    /// Whether this film was played against exactly `opponent`.
    pub fn is_against(&self, opponent: &str) -> bool {
        self.opponent == opponent
    }
}
