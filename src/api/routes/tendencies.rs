use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::Json;

use super::tendency_query;
use crate::analytics::{
    DefensiveTendencies, FormationReport, OffensiveTendencies, ReportParams, TendencyReport,
};
use crate::api::state::AppState;
use crate::api::ApiError;
use crate::models::CountStat;

/// Full tendency report.
pub async fn report(
    State(state): State<AppState>,
    params: Result<Query<ReportParams>, QueryRejection>,
) -> Result<Json<TendencyReport>, ApiError> {
    let query = tendency_query(params)?;
    Ok(Json(state.engine.report(&query).await?))
}

pub async fn defense(
    State(state): State<AppState>,
    params: Result<Query<ReportParams>, QueryRejection>,
) -> Result<Json<DefensiveTendencies>, ApiError> {
    let query = tendency_query(params)?;
    Ok(Json(state.engine.defense(&query).await?))
}

pub async fn offense(
    State(state): State<AppState>,
    params: Result<Query<ReportParams>, QueryRejection>,
) -> Result<Json<OffensiveTendencies>, ApiError> {
    let query = tendency_query(params)?;
    Ok(Json(state.engine.offense(&query).await?))
}

pub async fn formations(
    State(state): State<AppState>,
    params: Result<Query<ReportParams>, QueryRejection>,
) -> Result<Json<FormationReport>, ApiError> {
    let query = tendency_query(params)?;
    Ok(Json(state.engine.formations(&query).await?))
}

pub async fn play_calls(
    State(state): State<AppState>,
    params: Result<Query<ReportParams>, QueryRejection>,
) -> Result<Json<Vec<CountStat>>, ApiError> {
    let query = tendency_query(params)?;
    Ok(Json(state.engine.play_calls(&query).await?))
}

#[cfg(test)]
mod tests {
    use crate::api::routes::test_support::{app, get_json, seed};
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn test_opponent_report() {
        let tmp = tempfile::tempdir().unwrap();
        seed(tmp.path());

        let (status, json) = get_json(app(tmp.path()), "/api/tendencies?opponent=Rivals").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["overview"]["opponent"], "Rivals");
        assert_eq!(json["overview"]["totalGames"], 2);
        assert_eq!(json["overview"]["totalPlays"], 4);
        assert_eq!(json["blitzPatterns"]["totalPlays"], 4);
        assert_eq!(json["blitzPatterns"]["blitzRate"], 0.5);
        assert_eq!(
            json["defensiveFrontUsage"][0],
            json!({"name": "4-3 Over", "down": "1st", "count": 1})
        );
        assert_eq!(json["redZonePatterns"]["totalPlays"], 2);
        assert_eq!(json["redZonePatterns"]["touchdownRate"], 0.5);
        assert_eq!(json["redZonePatterns"]["fieldGoalRate"], 0.5);
        assert_eq!(json["thirdDownSuccessRates"]["totalAttempts"], 2);
        assert_eq!(json["thirdDownSuccessRates"]["conversions"], 2);
        assert_eq!(
            json["playCallTendencies"][0],
            json!({"name": "Power", "count": 2})
        );
    }

    #[tokio::test]
    async fn test_missing_scope_is_validation_error() {
        let tmp = tempfile::tempdir().unwrap();
        seed(tmp.path());

        let (status, json) = get_json(app(tmp.path()), "/api/tendencies").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["code"], "MISSING_SCOPE");

        let (status, json) = get_json(app(tmp.path()), "/api/tendencies/defense?opponent=").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["code"], "MISSING_SCOPE");

        let (status, json) =
            get_json(app(tmp.path()), "/api/tendencies?filmId=1&opponent=Rivals").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["code"], "AMBIGUOUS_SCOPE");
    }

    #[tokio::test]
    async fn test_unknown_opponent_is_not_found() {
        let tmp = tempfile::tempdir().unwrap();
        seed(tmp.path());

        let (status, json) =
            get_json(app(tmp.path()), "/api/tendencies?opponent=Unknown%20Team").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"]["code"], "OPPONENT_NOT_FOUND");

        let (status, json) = get_json(app(tmp.path()), "/api/tendencies/defense?filmId=42").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"]["code"], "FILM_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_film_without_plays_is_empty_report() {
        let tmp = tempfile::tempdir().unwrap();
        seed(tmp.path());

        let (status, json) = get_json(app(tmp.path()), "/api/tendencies/offense?filmId=3").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            json["thirdDownSuccessRates"],
            json!({
                "totalAttempts": 0,
                "conversions": 0,
                "successRate": 0.0,
                "topPlayCalls": []
            })
        );
    }

    #[tokio::test]
    async fn test_opponent_without_plays_is_empty_report() {
        let tmp = tempfile::tempdir().unwrap();
        seed(tmp.path());

        let (status, json) = get_json(app(tmp.path()), "/api/tendencies?opponent=Eagles").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            json["overview"],
            json!({"opponent": "Eagles", "totalGames": 1, "totalPlays": 0})
        );
        assert_eq!(json["blitzPatterns"]["blitzRate"], 0.0);
        assert_eq!(json["redZonePatterns"]["touchdownRate"], 0.0);
        assert_eq!(json["redZonePatterns"]["fieldGoalRate"], 0.0);
        assert_eq!(json["redZonePatterns"]["turnoverRate"], 0.0);
        assert_eq!(json["thirdDownSuccessRates"]["successRate"], 0.0);
        assert_eq!(json["playCallTendencies"], json!([]));
        assert_eq!(json["formationEffectiveness"], json!([]));
    }

    #[tokio::test]
    async fn test_invalid_parameters_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        seed(tmp.path());

        for uri in [
            "/api/tendencies?filmId=1&quarter=2",
            "/api/tendencies?filmId=abc",
            "/api/tendencies?filmId=1&down=5th",
            "/api/tendencies?filmId=1&distance%5Bgte%5D=9&distance%5Blte%5D=2",
        ] {
            let (status, json) = get_json(app(tmp.path()), uri).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
            assert_eq!(json["error"]["code"], "INVALID_QUERY", "{}", uri);
        }
    }

    #[tokio::test]
    async fn test_filtered_sections() {
        let tmp = tempfile::tempdir().unwrap();
        seed(tmp.path());

        let (status, json) = get_json(
            app(tmp.path()),
            "/api/tendencies/play-calls?opponent=Rivals&fieldPosition=redZone",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, json!([{"name": "Power", "count": 2}]));

        let (status, json) = get_json(
            app(tmp.path()),
            "/api/tendencies/formations?filmId=1&down=3rd",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["formationEffectiveness"][0]["formation"], "Shotgun");
        assert_eq!(json["formationEffectiveness"][0]["totalPlays"], 1);
        assert_eq!(json["formationEffectiveness"][0]["successRate"], 1.0);
        assert_eq!(json["personnelGroups"][0]["personnel"], "11 Personnel");
    }

    #[tokio::test]
    async fn test_missing_data_files_surface_as_not_found() {
        let tmp = tempfile::tempdir().unwrap();

        let (status, json) = get_json(app(tmp.path()), "/api/tendencies?opponent=Rivals").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"]["code"], "OPPONENT_NOT_FOUND");
    }
}
