//! Health check endpoint

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use tracing::{debug, warn};

use super::AppState;

/// Health check handler
///
/// Reports the configured model and dimension together with the number of
/// stored agents. Answers 503 while the store cannot be reached.
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    debug!("Health check requested");

    let service = &state.service;
    let mut response = json!({
        "status": "UP",
        "version": env!("CARGO_PKG_VERSION"),
        "model": service.embedder().model_id(),
        "dimension": service.store().dimension(),
    });

    match service.store().count().await {
        Ok(count) => {
            response["agents"] = json!(count);
            (StatusCode::OK, Json(response))
        }
        Err(e) => {
            warn!(error = %e, "Vector store health check failed");
            response["status"] = json!("DOWN");
            response["detail"] = json!(e.to_string());
            (StatusCode::SERVICE_UNAVAILABLE, Json(response))
        }
    }
}
