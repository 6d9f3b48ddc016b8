//! In-memory play record store.

use async_trait::async_trait;

use super::{PlayRecordStore, StorageError};
use crate::models::{FilmId, GameFilm, PlayRecord};

/// Play record store holding everything in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryPlayStore {
    games: Vec<GameFilm>,
    plays: Vec<PlayRecord>,
}

impl MemoryPlayStore {
    pub fn new(games: Vec<GameFilm>, plays: Vec<PlayRecord>) -> Self {
        Self { games, plays }
    }

    pub fn with_game(mut self, game: GameFilm) -> Self {
        self.games.push(game);
        self
    }

    pub fn with_plays(mut self, plays: impl IntoIterator<Item = PlayRecord>) -> Self {
        self.plays.extend(plays);
        self
    }

    fn sorted_games<F>(&self, predicate: F) -> Vec<GameFilm>
    where
        F: Fn(&GameFilm) -> bool,
    {
        let mut games: Vec<GameFilm> = self.games.iter().filter(|g| predicate(g)).cloned().collect();
        games.sort_by_key(|g| g.id);
        games
    }
}

#[async_trait]
impl PlayRecordStore for MemoryPlayStore {
    async fn find_games_by_opponent(&self, opponent: &str) -> Result<Vec<GameFilm>, StorageError> {
        Ok(self.sorted_games(|g| g.is_against(opponent)))
    }

    async fn find_game(&self, id: FilmId) -> Result<Option<GameFilm>, StorageError> {
        Ok(self.games.iter().find(|g| g.id == id).cloned())
    }

    async fn find_plays(&self, game_ids: &[FilmId]) -> Result<Vec<PlayRecord>, StorageError> {
        let mut plays: Vec<PlayRecord> = self
            .plays
            .iter()
            .filter(|p| game_ids.contains(&p.film_id))
            .cloned()
            .collect();
        plays.sort_by_key(|p| (p.film_id, p.play_number, p.id));
        Ok(plays)
    }

    async fn list_games(&self) -> Result<Vec<GameFilm>, StorageError> {
        Ok(self.sorted_games(|_| true))
    }
}
