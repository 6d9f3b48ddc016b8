//! Query orchestration against a play record store.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info};

use super::formation::{formation_report, FormationReport};
use super::query::TendencyQuery;
use super::report::{
    defensive_tendencies, offensive_tendencies, play_call_tendencies, DefensiveTendencies,
    OffensiveTendencies, TendencyReport,
};
use super::scope::{resolve, ResolvedScope};
use super::{QueryError, TendencySettings};
use crate::models::{CountStat, PlayRecord};
use crate::storage::PlayRecordStore;

/// One row of the opponent directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpponentSummary {
    pub opponent_name: String,
    pub game_count: u32,
    pub first_game_date: NaiveDate,
    pub last_game_date: NaiveDate,
}

/// Answers tendency queries. Cheap to clone; every clone shares the store.
#[derive(Clone)]
pub struct TendencyEngine {
    store: Arc<dyn PlayRecordStore>,
    settings: Arc<TendencySettings>,
}

impl TendencyEngine {
    pub fn new(store: Arc<dyn PlayRecordStore>, settings: TendencySettings) -> Self {
        Self {
            store,
            settings: Arc::new(settings),
        }
    }

    pub fn settings(&self) -> &TendencySettings {
        &self.settings
    }

    /// Resolve the scope, load its plays and apply the filter once.
    ///
    /// Plays come back ordered by (game id, play number).
    pub async fn scoped_plays(
        &self,
        query: &TendencyQuery,
    ) -> Result<(ResolvedScope, Vec<PlayRecord>), QueryError> {
        let resolved = resolve(self.store.as_ref(), &query.scope).await?;
        let loaded = self.store.find_plays(&resolved.game_ids()).await?;
        let loaded_count = loaded.len();

        let mut plays = query.filter.predicate().apply(loaded);
        plays.sort_by_key(|p| (p.film_id, p.play_number, p.id));

        debug!(
            "{}: {} play(s) loaded, {} after filtering",
            query.scope,
            loaded_count,
            plays.len()
        );
        Ok((resolved, plays))
    }

    /// Every report section, computed over the same filtered plays.
    pub async fn report(&self, query: &TendencyQuery) -> Result<TendencyReport, QueryError> {
        let (resolved, plays) = self.scoped_plays(query).await?;
        let settings = &self.settings;

        let report = TendencyReport::assemble(
            resolved.overview(plays.len()),
            defensive_tendencies(&plays, settings.top_n),
            offensive_tendencies(&plays, settings.top_n, &settings.personnel),
            formation_report(&plays, &settings.success_rule, &settings.personnel),
        );

        info!(
            "Tendency report for {}: {} game(s), {} play(s)",
            query.scope,
            report.overview.total_games,
            report.overview.total_plays
        );
        Ok(report)
    }

    pub async fn defense(&self, query: &TendencyQuery) -> Result<DefensiveTendencies, QueryError> {
        let (_, plays) = self.scoped_plays(query).await?;
        Ok(defensive_tendencies(&plays, self.settings.top_n))
    }

    pub async fn offense(&self, query: &TendencyQuery) -> Result<OffensiveTendencies, QueryError> {
        let (_, plays) = self.scoped_plays(query).await?;
        Ok(offensive_tendencies(
            &plays,
            self.settings.top_n,
            &self.settings.personnel,
        ))
    }

    pub async fn formations(&self, query: &TendencyQuery) -> Result<FormationReport, QueryError> {
        let (_, plays) = self.scoped_plays(query).await?;
        Ok(formation_report(
            &plays,
            &self.settings.success_rule,
            &self.settings.personnel,
        ))
    }

    pub async fn play_calls(&self, query: &TendencyQuery) -> Result<Vec<CountStat>, QueryError> {
        let (_, plays) = self.scoped_plays(query).await?;
        Ok(play_call_tendencies(&plays))
    }

    pub async fn plays(&self, query: &TendencyQuery) -> Result<Vec<PlayRecord>, QueryError> {
        let (_, plays) = self.scoped_plays(query).await?;
        Ok(plays)
    }

    /// Opponents with at least one logged game, ordered by name.
    pub async fn opponents(&self) -> Result<Vec<OpponentSummary>, QueryError> {
        let games = self.store.list_games().await?;

        let mut by_opponent: BTreeMap<&str, OpponentSummary> = BTreeMap::new();
        for game in games.iter().filter(|g| !g.opponent.trim().is_empty()) {
            by_opponent
                .entry(game.opponent.as_str())
                .and_modify(|summary| {
                    summary.game_count += 1;
                    summary.first_game_date = summary.first_game_date.min(game.game_date);
                    summary.last_game_date = summary.last_game_date.max(game.game_date);
                })
                .or_insert_with(|| OpponentSummary {
                    opponent_name: game.opponent.clone(),
                    game_count: 1,
                    first_game_date: game.game_date,
                    last_game_date: game.game_date,
                });
        }

        Ok(by_opponent.into_values().collect())
    }
}
