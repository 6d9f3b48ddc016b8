//! Tendency analytics over charted plays.
//!
//! A query names a scope (one film, or every film against an opponent) plus
//! an optional [`PlayFilter`]. The engine resolves the scope, loads the
//! plays, filters them once, and then computes each report section
//! independently from that same filtered set.
//!
//! - **filter**: the closed set of play filters and their predicate
//! - **group**: group-by/count/order primitive shared by every section
//! - **rate**: ratio definitions (blitz, third down, red zone)
//! - **formation**: formation effectiveness and personnel grouping
//! - **report**: section types and assembly
//! - **engine**: scope resolution and orchestration against a store

pub mod engine;
pub mod filter;
pub mod formation;
pub mod group;
pub mod query;
pub mod rate;
pub mod report;
pub mod scope;

pub use engine::{OpponentSummary, TendencyEngine};
pub use filter::{DistanceRange, FieldPosition, PlayFilter, PlayPredicate};
pub use formation::{
    FormationEffectiveness, FormationReport, PersonnelConfig, PersonnelGroup, PersonnelRule,
    PersonnelTable, SuccessRule,
};
pub use query::{ReportParams, TendencyQuery};
pub use report::{
    BlitzPatterns, DefensiveTendencies, OffensiveTendencies, RedZonePatterns,
    ThirdDownSuccessRates, TendencyReport,
};
pub use scope::{ResolvedScope, Scope, ScopeOverview};

use thiserror::Error;

use crate::config::AnalyticsConfig;
use crate::models::FilmId;
use crate::storage::StorageError;

/// Number of entries kept in "top" lists when nothing is configured.
pub const DEFAULT_TOP_N: usize = 5;

/// Errors a tendency query can fail with.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("Either filmId or opponent must be provided")]
    MissingScope,

    #[error("Provide filmId or opponent, not both")]
    AmbiguousScope,

    #[error("Invalid filter: {0}")]
    InvalidFilter(String),

    #[error("No games found for opponent: {0}")]
    OpponentNotFound(String),

    #[error("Game film not found: {0}")]
    FilmNotFound(FilmId),

    #[error("Play store unavailable: {0}")]
    Upstream(#[from] StorageError),
}

/// Analytics knobs resolved from configuration.
#[derive(Debug, Clone)]
pub struct TendencySettings {
    pub top_n: usize,
    pub success_rule: SuccessRule,
    pub personnel: PersonnelTable,
}

impl Default for TendencySettings {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            success_rule: SuccessRule::default(),
            personnel: PersonnelTable::default(),
        }
    }
}

impl TendencySettings {
    /// Build settings from the `[analytics]` config table, compiling the
    /// personnel rules.
    pub fn from_config(config: &AnalyticsConfig) -> Result<Self, regex::Error> {
        Ok(Self {
            top_n: config.top_n,
            success_rule: config.success.clone(),
            personnel: PersonnelTable::from_config(&config.personnel)?,
        })
    }
}
