//! Import of charted games and plays into the data lake.
//!
//! Input files are JSONL in the stored record format. A batch is validated
//! as a whole against what is already stored; if any record is rejected,
//! nothing is written.

use std::collections::HashSet;
use std::path::Path;

use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{info, warn};

use crate::models::{FilmId, GameFilm, PlayRecord, MAX_YARD_LINE};
use crate::storage::{EntityType, JsonlReader, JsonlWriter, StorageConfig, StorageError};

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("{path}:{line}: {source}")]
    Parse {
        path: String,
        line: usize,
        source: serde_json::Error,
    },

    #[error("{} record(s) rejected: {}", .0.len(), .0.join("; "))]
    Invalid(Vec<String>),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Counts of records appended by one import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestResult {
    pub games_imported: usize,
    pub plays_imported: usize,
}

/// Parse a JSONL file strictly: any malformed line fails the load.
pub fn load_jsonl<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, IngestError> {
    let display = path.display().to_string();
    let content = std::fs::read_to_string(path).map_err(|source| IngestError::Read {
        path: display.clone(),
        source,
    })?;

    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| {
            serde_json::from_str(line).map_err(|source| IngestError::Parse {
                path: display.clone(),
                line: idx + 1,
                source,
            })
        })
        .collect()
}

/// Check a batch against the records already stored. Returns one message
/// per problem found.
pub fn validate_batch(
    existing_games: &[GameFilm],
    existing_plays: &[PlayRecord],
    games: &[GameFilm],
    plays: &[PlayRecord],
) -> Vec<String> {
    let mut problems = Vec::new();

    let mut game_ids: HashSet<FilmId> = existing_games.iter().map(|g| g.id).collect();
    for game in games {
        if game.opponent.trim().is_empty() {
            problems.push(format!("game {}: opponent is empty", game.id));
        }
        if !game_ids.insert(game.id) {
            problems.push(format!("game {}: duplicate id", game.id));
        }
    }

    let mut play_ids: HashSet<u64> = existing_plays.iter().map(|p| p.id).collect();
    for play in plays {
        if !play_ids.insert(play.id) {
            problems.push(format!("play {}: duplicate id", play.id));
        }
        if !game_ids.contains(&play.film_id) {
            problems.push(format!("play {}: unknown game {}", play.id, play.film_id));
        }
        if !play.has_consistent_situation() {
            problems.push(format!(
                "play {}: down, distance and yard line (<= {}) must be set together",
                play.id, MAX_YARD_LINE
            ));
        }
    }

    problems
}

/// Validate and append games and plays to the data lake.
pub fn import(
    storage: &StorageConfig,
    games: Vec<GameFilm>,
    plays: Vec<PlayRecord>,
) -> Result<IngestResult, IngestError> {
    let existing_games = JsonlReader::<GameFilm>::for_entity(storage, EntityType::Game).read_all()?;
    let existing_plays = JsonlReader::<PlayRecord>::for_entity(storage, EntityType::Play).read_all()?;

    let problems = validate_batch(&existing_games, &existing_plays, &games, &plays);
    if !problems.is_empty() {
        for problem in &problems {
            warn!("Rejected: {}", problem);
        }
        return Err(IngestError::Invalid(problems));
    }

    let games_imported =
        JsonlWriter::<GameFilm>::for_entity(storage, EntityType::Game).append_batch(&games)?;
    let plays_imported =
        JsonlWriter::<PlayRecord>::for_entity(storage, EntityType::Play).append_batch(&plays)?;

    info!(
        "Imported {} game(s) and {} play(s)",
        games_imported, plays_imported
    );
    Ok(IngestResult {
        games_imported,
        plays_imported,
    })
}
