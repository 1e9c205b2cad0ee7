//! HTTP route handlers.

pub mod extract;
pub mod health;

use std::sync::Arc;

use axum::http::StatusCode;
use axum::{Json, Router};
use incidex_core::Error;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use crate::state::AppState;

/// Build the main Axum router with all routes.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(extract::routes())
        .merge(health::routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Map a pipeline error to `{detail, error_type}` with the matching status.
pub fn error_response(err: &Error) -> (StatusCode, Json<serde_json::Value>) {
    let (status, detail) = match err {
        Error::InvalidInput(_) => {
            warn!("Invalid input: {}", err);
            (StatusCode::BAD_REQUEST, err.to_string())
        }
        Error::Backend(_) => {
            error!("LLM service error: {}", err);
            (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
        }
        Error::MalformedResponse { .. } => {
            error!("Invalid JSON response: {}", err);
            (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
        }
        _ => {
            error!("Unexpected error: {}", err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            )
        }
    };

    (
        status,
        Json(serde_json::json!({
            "detail": detail,
            "error_type": err.kind(),
        })),
    )
}
