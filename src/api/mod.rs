//! REST API endpoints.
//!
//! Axum-based HTTP API answering tendency queries over logged game film.

pub mod routes;
pub mod state;

use std::time::Duration;

use axum::extract::rejection::QueryRejection;
use axum::http::{HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use thiserror::Error;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use crate::analytics::QueryError;
use crate::config::ServerConfig;
use crate::models::FilmId;
use state::AppState;

/// API error types.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Either filmId or opponent must be provided")]
    MissingScope,

    #[error("Provide filmId or opponent, not both")]
    AmbiguousScope,

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("No games found for opponent: {0}")]
    OpponentNotFound(String),

    #[error("Game film not found: {0}")]
    FilmNotFound(FilmId),

    #[error("Upstream failure: {0}")]
    Upstream(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingScope | ApiError::AmbiguousScope | ApiError::InvalidQuery(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::OpponentNotFound(_) | ApiError::FilmNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::MissingScope => "MISSING_SCOPE",
            ApiError::AmbiguousScope => "AMBIGUOUS_SCOPE",
            ApiError::InvalidQuery(_) => "INVALID_QUERY",
            ApiError::OpponentNotFound(_) => "OPPONENT_NOT_FOUND",
            ApiError::FilmNotFound(_) => "FILM_NOT_FOUND",
            ApiError::Upstream(_) => "UPSTREAM_FAILURE",
        }
    }
}

impl From<QueryError> for ApiError {
    fn from(err: QueryError) -> Self {
        match err {
            QueryError::MissingScope => ApiError::MissingScope,
            QueryError::AmbiguousScope => ApiError::AmbiguousScope,
            QueryError::InvalidFilter(msg) => ApiError::InvalidQuery(msg),
            QueryError::OpponentNotFound(name) => ApiError::OpponentNotFound(name),
            QueryError::FilmNotFound(id) => ApiError::FilmNotFound(id),
            QueryError::Upstream(e) => ApiError::Upstream(e.to_string()),
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::InvalidQuery(rejection.body_text())
    }
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("{}", self);
        }

        let body = ErrorResponse {
            error: ErrorDetail {
                code: self.code().to_string(),
                message: self.to_string(),
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Build the application router with tracing and CORS layers.
pub fn build_router(state: AppState, server: &ServerConfig) -> Router {
    Router::new()
        .route("/api/health", get(routes::health))
        .route("/api/tendencies", get(routes::tendencies::report))
        .route("/api/tendencies/defense", get(routes::tendencies::defense))
        .route("/api/tendencies/offense", get(routes::tendencies::offense))
        .route("/api/tendencies/formations", get(routes::tendencies::formations))
        .route("/api/tendencies/play-calls", get(routes::tendencies::play_calls))
        .route("/api/plays", get(routes::films::plays))
        .route("/api/opponents", get(routes::films::opponents))
        .layer(TraceLayer::new_for_http())
        .layer(build_cors_layer(server))
        .with_state(state)
}

/// CORS for read-only access. `*` allows any origin.
pub fn build_cors_layer(server: &ServerConfig) -> CorsLayer {
    let origin = if server.cors_origin == "*" {
        AllowOrigin::any()
    } else {
        match HeaderValue::from_str(&server.cors_origin) {
            Ok(value) => AllowOrigin::exact(value),
            Err(_) => {
                warn!(
                    "Invalid CORS origin {:?}, allowing any origin",
                    server.cors_origin
                );
                AllowOrigin::any()
            }
        }
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::OPTIONS])
        .max_age(Duration::from_secs(3600))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::StorageError;

    #[test]
    fn test_query_error_mapping() {
        let cases = [
            (QueryError::MissingScope, StatusCode::BAD_REQUEST, "MISSING_SCOPE"),
            (QueryError::AmbiguousScope, StatusCode::BAD_REQUEST, "AMBIGUOUS_SCOPE"),
            (
                QueryError::InvalidFilter("bad".to_string()),
                StatusCode::BAD_REQUEST,
                "INVALID_QUERY",
            ),
            (
                QueryError::OpponentNotFound("Unknown Team".to_string()),
                StatusCode::NOT_FOUND,
                "OPPONENT_NOT_FOUND",
            ),
            (QueryError::FilmNotFound(4), StatusCode::NOT_FOUND, "FILM_NOT_FOUND"),
            (
                QueryError::Upstream(StorageError::Unavailable("down".to_string())),
                StatusCode::BAD_GATEWAY,
                "UPSTREAM_FAILURE",
            ),
        ];

        for (err, status, code) in cases {
            let api: ApiError = err.into();
            assert_eq!(api.status(), status);
            assert_eq!(api.code(), code);
        }
    }

    #[tokio::test]
    async fn test_error_body_shape() {
        let resp = ApiError::OpponentNotFound("Unknown Team".to_string()).into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"]["code"], "OPPONENT_NOT_FOUND");
        assert_eq!(
            json["error"]["message"],
            "No games found for opponent: Unknown Team"
        );
    }
}
