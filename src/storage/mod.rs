//! Play record storage.
//!
//! The analytics engine consumes games and plays through the
//! [`PlayRecordStore`] trait. Two implementations ship with the crate:
//! - [`JsonlPlayStore`]: the on-disk JSONL data lake
//! - [`MemoryPlayStore`]: an in-process store for tests and embedding

mod jsonl;
mod memory;

pub use jsonl::*;
pub use memory::*;

use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{FilmId, GameFilm, PlayRecord};

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Configuration for storage paths.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
}

impl StorageConfig {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    pub fn normalized_dir(&self) -> PathBuf {
        self.data_dir.join("normalized")
    }

    pub fn games_path(&self) -> PathBuf {
        entity_path(self, EntityType::Game)
    }

    pub fn plays_path(&self) -> PathBuf {
        entity_path(self, EntityType::Play)
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::new(PathBuf::from("./data"))
    }
}

/// Read-only view of logged games and plays.
///
/// Implementations own their own retry policy; the analytics engine
/// surfaces any error returned here as an upstream failure.
#[async_trait]
pub trait PlayRecordStore: Send + Sync {
    /// Every film whose opponent exactly equals `opponent`.
    async fn find_games_by_opponent(&self, opponent: &str) -> Result<Vec<GameFilm>, StorageError>;

    async fn find_game(&self, id: FilmId) -> Result<Option<GameFilm>, StorageError>;

    /// All plays logged against any of `game_ids`.
    async fn find_plays(&self, game_ids: &[FilmId]) -> Result<Vec<PlayRecord>, StorageError>;

    async fn list_games(&self) -> Result<Vec<GameFilm>, StorageError>;
}
