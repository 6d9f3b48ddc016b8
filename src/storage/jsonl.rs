//! JSONL (JSON Lines) storage.
//!
//! JSONL is the source of truth for logged games and plays.
//! Each line is a valid JSON object representing one entity.

use std::collections::HashSet;
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::marker::PhantomData;
use std::path::PathBuf;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, info, warn};

use super::{PlayRecordStore, StorageConfig, StorageError};
use crate::models::{FilmId, GameFilm, PlayRecord};

/// Entity types for JSONL storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityType {
    Game,
    Play,
}

impl EntityType {
    /// Get the filename for this entity type.
    pub fn filename(&self) -> &'static str {
        match self {
            EntityType::Game => "games.jsonl",
            EntityType::Play => "plays.jsonl",
        }
    }
}

/// Get the path for an entity file.
pub fn entity_path(config: &StorageConfig, entity: EntityType) -> PathBuf {
    config.normalized_dir().join(entity.filename())
}

/// JSONL file writer.
pub struct JsonlWriter<T> {
    path: PathBuf,
    _marker: PhantomData<T>,
}

impl<T: Serialize> JsonlWriter<T> {
    /// Create a new JSONL writer for the given path.
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _marker: PhantomData,
        }
    }

    /// Create a writer for a specific entity type.
    pub fn for_entity(config: &StorageConfig, entity: EntityType) -> Self {
        Self::new(entity_path(config, entity))
    }

    /// Ensure the parent directory exists.
    fn ensure_dir(&self) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(())
    }

    /// Append multiple entities to the file.
    pub fn append_batch(&self, entities: &[T]) -> Result<usize, StorageError> {
        if entities.is_empty() {
            return Ok(0);
        }

        self.ensure_dir()?;

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        let mut writer = BufWriter::new(file);
        let mut count = 0;

        for entity in entities {
            let json = serde_json::to_string(entity)?;
            writeln!(writer, "{}", json)?;
            count += 1;
        }

        writer.flush()?;
        info!("Appended {} entities to {:?}", count, self.path);

        Ok(count)
    }

    /// Write entities, replacing the entire file.
    pub fn write_all(&self, entities: &[T]) -> Result<usize, StorageError> {
        self.ensure_dir()?;

        let file = File::create(&self.path)?;
        let mut writer = BufWriter::new(file);
        let mut count = 0;

        for entity in entities {
            let json = serde_json::to_string(entity)?;
            writeln!(writer, "{}", json)?;
            count += 1;
        }

        writer.flush()?;
        info!("Wrote {} entities to {:?}", count, self.path);

        Ok(count)
    }
}

/// JSONL file reader.
pub struct JsonlReader<T> {
    path: PathBuf,
    _marker: PhantomData<T>,
}

impl<T: DeserializeOwned> JsonlReader<T> {
    /// Create a new JSONL reader for the given path.
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _marker: PhantomData,
        }
    }

    /// Create a reader for a specific entity type.
    pub fn for_entity(config: &StorageConfig, entity: EntityType) -> Self {
        Self::new(entity_path(config, entity))
    }

    /// Read all entities from the file.
    ///
    /// A missing file reads as empty. Lines that fail to parse are skipped,
    /// and the number skipped is logged once per read.
    pub fn read_all(&self) -> Result<Vec<T>, StorageError> {
        let (entities, skipped) = self.read_counting_skipped()?;
        if skipped > 0 {
            warn!(
                "Skipped {} malformed line(s) in {:?}; results omit those records",
                skipped, self.path
            );
        }

        debug!("Read {} entities from {:?}", entities.len(), self.path);
        Ok(entities)
    }

    fn read_counting_skipped(&self) -> Result<(Vec<T>, usize), StorageError> {
        if !self.path.exists() {
            return Ok((Vec::new(), 0));
        }

        let file = File::open(&self.path)?;
        let reader = BufReader::new(file);
        let mut entities = Vec::new();
        let mut skipped = 0;
        let mut line_num = 0;

        for line in reader.lines() {
            line_num += 1;
            let line = line?;

            if line.trim().is_empty() {
                continue;
            }

            match serde_json::from_str(&line) {
                Ok(entity) => entities.push(entity),
                Err(e) => {
                    skipped += 1;
                    warn!(
                        "Failed to parse line {} in {:?}: {}",
                        line_num, self.path, e
                    );
                }
            }
        }

        Ok((entities, skipped))
    }

    /// Read entities matching a predicate.
    pub fn read_where<F>(&self, predicate: F) -> Result<Vec<T>, StorageError>
    where
        F: Fn(&T) -> bool,
    {
        let all = self.read_all()?;
        Ok(all.into_iter().filter(predicate).collect())
    }
}

/// Play record store backed by the JSONL data lake.
///
/// Files are re-read on every call so that newly imported plays are
/// visible without a restart.
#[derive(Debug, Clone)]
pub struct JsonlPlayStore {
    config: StorageConfig,
}

impl JsonlPlayStore {
    pub fn new(config: StorageConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    async fn read_games<F>(&self, predicate: F) -> Result<Vec<GameFilm>, StorageError>
    where
        F: Fn(&GameFilm) -> bool + Send + 'static,
    {
        let reader = JsonlReader::<GameFilm>::for_entity(&self.config, EntityType::Game);
        let mut games = tokio::task::spawn_blocking(move || reader.read_where(predicate))
            .await
            .map_err(|e| StorageError::Unavailable(e.to_string()))??;
        games.sort_by_key(|g| g.id);
        Ok(games)
    }
}

#[async_trait]
impl PlayRecordStore for JsonlPlayStore {
    async fn find_games_by_opponent(&self, opponent: &str) -> Result<Vec<GameFilm>, StorageError> {
        let opponent = opponent.to_string();
        self.read_games(move |g| g.is_against(&opponent)).await
    }

    async fn find_game(&self, id: FilmId) -> Result<Option<GameFilm>, StorageError> {
        let games = self.read_games(move |g| g.id == id).await?;
        Ok(games.into_iter().next())
    }

    async fn find_plays(&self, game_ids: &[FilmId]) -> Result<Vec<PlayRecord>, StorageError> {
        let wanted: HashSet<FilmId> = game_ids.iter().copied().collect();
        let reader = JsonlReader::<PlayRecord>::for_entity(&self.config, EntityType::Play);
        let mut plays =
            tokio::task::spawn_blocking(move || reader.read_where(|p| wanted.contains(&p.film_id)))
                .await
                .map_err(|e| StorageError::Unavailable(e.to_string()))??;
        plays.sort_by_key(|p| (p.film_id, p.play_number, p.id));
        Ok(plays)
    }

    async fn list_games(&self) -> Result<Vec<GameFilm>, StorageError> {
        self.read_games(|_| true).await
    }
}
