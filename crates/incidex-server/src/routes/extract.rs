//! Incident extraction route.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;
use tracing::{info, warn, Instrument};

use crate::routes::error_response;
use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/extract", post(extract_incident))
}

#[derive(Debug, Deserialize)]
pub struct IncidentRequest {
    pub text: String,
}

/// POST /extract — run the pipeline on one incident description.
async fn extract_incident(
    State(state): State<Arc<AppState>>,
    body: Result<Json<IncidentRequest>, JsonRejection>,
) -> Response {
    let req = match body {
        Ok(Json(req)) => req,
        Err(rejection) => {
            warn!("Rejected request body: {}", rejection.body_text());
            return (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({
                    "detail": rejection.body_text(),
                    "error_type": "invalid_input",
                })),
            )
                .into_response();
        }
    };

    let request_id = uuid::Uuid::new_v4();
    let span = tracing::info_span!("extract", %request_id);

    async move {
        info!("Processing incident text ({} chars)", req.text.chars().count());

        let deadline = state.config.request_timeout();
        match tokio::time::timeout(deadline, state.pipeline.extract(&req.text)).await {
            Ok(Ok(incident)) => {
                info!("Extraction succeeded");
                Json(incident).into_response()
            }
            Ok(Err(e)) => error_response(&e).into_response(),
            Err(_) => {
                warn!("Extraction abandoned after {}s", deadline.as_secs());
                (
                    StatusCode::GATEWAY_TIMEOUT,
                    Json(serde_json::json!({
                        "detail": format!(
                            "Extraction did not finish within {}s",
                            deadline.as_secs()
                        ),
                        "error_type": "timeout",
                    })),
                )
                    .into_response()
            }
        }
    }
    .instrument(span)
    .await
}
