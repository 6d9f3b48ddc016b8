use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::Json;

use super::tendency_query;
use crate::analytics::{OpponentSummary, ReportParams};
use crate::api::state::AppState;
use crate::api::ApiError;
use crate::models::PlayRecord;

/// Filtered plays for a scope, ordered by game and play number.
pub async fn plays(
    State(state): State<AppState>,
    params: Result<Query<ReportParams>, QueryRejection>,
) -> Result<Json<Vec<PlayRecord>>, ApiError> {
    let query = tendency_query(params)?;
    Ok(Json(state.engine.plays(&query).await?))
}

/// Every opponent with logged film.
pub async fn opponents(
    State(state): State<AppState>,
) -> Result<Json<Vec<OpponentSummary>>, ApiError> {
    Ok(Json(state.engine.opponents().await?))
}
