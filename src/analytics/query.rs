//! Request parameters and their validation into a typed query.

use serde::Deserialize;

use super::filter::{DistanceRange, FieldPosition, PlayFilter};
use super::scope::Scope;
use super::QueryError;
use crate::models::{Down, FilmId, PlayResult};

/// Raw query-string parameters shared by every tendency route.
///
/// Unknown parameters are rejected at deserialization.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ReportParams {
    pub film_id: Option<FilmId>,
    pub opponent: Option<String>,
    pub down: Option<Down>,
    #[serde(rename = "distance[gte]")]
    pub distance_gte: Option<u32>,
    #[serde(rename = "distance[lte]")]
    pub distance_lte: Option<u32>,
    pub formation: Option<String>,
    pub field_position: Option<FieldPosition>,
    pub play_result: Option<PlayResult>,
}

/// A validated query: exactly one scope plus a satisfiable filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TendencyQuery {
    pub scope: Scope,
    pub filter: PlayFilter,
}

impl TendencyQuery {
    pub fn new(scope: Scope, filter: PlayFilter) -> Self {
        Self { scope, filter }
    }
}

impl TryFrom<ReportParams> for TendencyQuery {
    type Error = QueryError;

    fn try_from(params: ReportParams) -> Result<Self, Self::Error> {
        let scope = Scope::from_parts(params.film_id, params.opponent)?;

        let distance = DistanceRange {
            gte: params.distance_gte,
            lte: params.distance_lte,
        };
        if distance.is_inverted() {
            return Err(QueryError::InvalidFilter(format!(
                "distance[gte] ({}) exceeds distance[lte] ({})",
                distance.gte.unwrap_or_default(),
                distance.lte.unwrap_or_default()
            )));
        }

        let formation = match params.formation {
            Some(f) if f.trim().is_empty() => {
                return Err(QueryError::InvalidFilter(
                    "formation must not be empty".to_string(),
                ))
            }
            other => other,
        };

        Ok(Self {
            scope,
            filter: PlayFilter {
                down: params.down,
                distance,
                formation,
                field_position: params.field_position,
                play_result: params.play_result,
            },
        })
    }
}
