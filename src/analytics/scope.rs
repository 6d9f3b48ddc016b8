//! Query scope: one game, or every game against one opponent.

use std::fmt;

use serde::Serialize;
use tracing::debug;

use super::QueryError;
use crate::models::{FilmId, GameFilm};
use crate::storage::PlayRecordStore;

/// The set of games a query aggregates over, before resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    Film(FilmId),
    Opponent(String),
}

impl Scope {
    /// Build a scope from the two optional request fields. Exactly one must
    /// be supplied. A blank opponent name counts as not supplied.
    pub fn from_parts(film_id: Option<FilmId>, opponent: Option<String>) -> Result<Self, QueryError> {
        let opponent = opponent.filter(|name| !name.trim().is_empty());
        match (film_id, opponent) {
            (None, None) => Err(QueryError::MissingScope),
            (Some(_), Some(_)) => Err(QueryError::AmbiguousScope),
            (Some(id), None) => Ok(Scope::Film(id)),
            (None, Some(name)) => Ok(Scope::Opponent(name)),
        }
    }

    pub fn film_id(&self) -> Option<FilmId> {
        match self {
            Scope::Film(id) => Some(*id),
            Scope::Opponent(_) => None,
        }
    }

    pub fn opponent(&self) -> Option<&str> {
        match self {
            Scope::Film(_) => None,
            Scope::Opponent(name) => Some(name),
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Film(id) => write!(f, "film {}", id),
            Scope::Opponent(name) => write!(f, "opponent {:?}", name),
        }
    }
}

/// A scope together with the games it resolved to, ordered by game id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedScope {
    pub scope: Scope,
    pub games: Vec<GameFilm>,
}

impl ResolvedScope {
    pub fn game_ids(&self) -> Vec<FilmId> {
        self.games.iter().map(|g| g.id).collect()
    }

    pub fn overview(&self, total_plays: usize) -> ScopeOverview {
        ScopeOverview {
            film_id: self.scope.film_id(),
            opponent: self.scope.opponent().map(str::to_string),
            total_games: self.games.len() as u32,
            total_plays: total_plays as u32,
        }
    }
}

/// Summary of what a report covers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScopeOverview {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub film_id: Option<FilmId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opponent: Option<String>,
    pub total_games: u32,
    pub total_plays: u32,
}

/// Resolve a scope to its games.
///
/// Zero matching games is a not-found error, distinct from a scope whose
/// games simply have no plays logged yet.
pub async fn resolve(store: &dyn PlayRecordStore, scope: &Scope) -> Result<ResolvedScope, QueryError> {
    let mut games = match scope {
        Scope::Film(id) => match store.find_game(*id).await? {
            Some(game) => vec![game],
            None => return Err(QueryError::FilmNotFound(*id)),
        },
        Scope::Opponent(name) => {
            let games = store.find_games_by_opponent(name).await?;
            if games.is_empty() {
                return Err(QueryError::OpponentNotFound(name.clone()));
            }
            games
        }
    };
    games.sort_by_key(|g| g.id);
    games.dedup_by_key(|g| g.id);

    debug!("Resolved {} to {} game(s)", scope, games.len());
    Ok(ResolvedScope {
        scope: scope.clone(),
        games,
    })
}
