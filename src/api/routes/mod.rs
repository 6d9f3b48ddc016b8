pub mod films;
pub mod tendencies;

use axum::extract::rejection::QueryRejection;
use axum::extract::Query;
use axum::Json;
use serde::Serialize;

use crate::analytics::{ReportParams, TendencyQuery};
use crate::api::ApiError;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Validate query-string parameters into a tendency query.
///
/// Malformed or unknown parameters are reported as `INVALID_QUERY` before
/// the scope is checked.
pub(crate) fn tendency_query(
    params: Result<Query<ReportParams>, QueryRejection>,
) -> Result<TendencyQuery, ApiError> {
    let Query(params) = params?;
    Ok(TendencyQuery::try_from(params)?)
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use chrono::NaiveDate;
    use serde_json::Value;
    use tower::util::ServiceExt;

    use crate::analytics::{TendencyEngine, TendencySettings};
    use crate::api::build_router;
    use crate::api::state::AppState;
    use crate::config::ServerConfig;
    use crate::models::{Down, GameFilm, PlayRecord, PlayResult, NO_BLITZ};
    use crate::storage::{EntityType, JsonlPlayStore, JsonlWriter, StorageConfig};

    pub async fn get_json(app: axum::Router, uri: &str) -> (StatusCode, Value) {
        let resp = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = resp.status();
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
        (status, json)
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// Rivals: games 1 and 2. Eagles: game 3 with no plays charted.
    pub fn seed(dir: &std::path::Path) {
        let storage = StorageConfig::new(dir.to_path_buf());
        JsonlWriter::<GameFilm>::for_entity(&storage, EntityType::Game)
            .write_all(&[
                GameFilm::new(1, "Rivals", date(2025, 9, 5)),
                GameFilm::new(2, "Rivals", date(2025, 10, 17)),
                GameFilm::new(3, "Eagles", date(2025, 9, 26)),
            ])
            .unwrap();

        let plays = vec![
            PlayRecord::new(1, 1, 1, 1)
                .with_situation(Down::First, 10, 75)
                .with_formation("Shotgun")
                .with_play_call("Inside Zone")
                .with_result(PlayResult::Other, 4)
                .with_defensive_front("4-3 Over")
                .with_defensive_personnel("Base")
                .with_coverage("Cover 3")
                .with_blitz(NO_BLITZ),
            PlayRecord::new(2, 1, 2, 1)
                .with_situation(Down::Third, 6, 71)
                .with_formation("Shotgun")
                .with_play_call("Stick")
                .with_result(PlayResult::FirstDown, 8)
                .with_defensive_front("4-3 Over")
                .with_defensive_personnel("Nickel")
                .with_coverage("Cover 1")
                .with_blitz("fire_zone"),
            PlayRecord::new(3, 1, 3, 2)
                .with_situation(Down::Third, 3, 15)
                .with_play_call("Power")
                .with_result(PlayResult::Touchdown, 15)
                .with_defensive_front("Bear")
                .with_coverage("Cover 0")
                .with_blitz("zero"),
            PlayRecord::new(4, 2, 1, 1)
                .with_situation(Down::Second, 7, 18)
                .with_formation("I-Form")
                .with_play_call("Power")
                .with_result(PlayResult::FieldGoal, 0)
                .with_defensive_front("4-3 Over")
                .with_coverage("Cover 3"),
        ];
        JsonlWriter::<PlayRecord>::for_entity(&storage, EntityType::Play)
            .write_all(&plays)
            .unwrap();
    }

    pub fn app(dir: &std::path::Path) -> axum::Router {
        let store = JsonlPlayStore::new(StorageConfig::new(dir.to_path_buf()));
        let engine = TendencyEngine::new(Arc::new(store), TendencySettings::default());
        build_router(AppState::new(engine), &ServerConfig::default())
    }
}
