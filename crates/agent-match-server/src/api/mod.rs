//! API module for the agent matching server
//!
//! This module contains the routes and handlers of the HTTP boundary.

use axum::{
    error_handling::HandleErrorLayer,
    routing::{get, post},
    BoxError, Router,
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use agent_match_core::MatchingService;

pub mod agents;
pub mod errors;
pub mod health;

/// State shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub service: MatchingService,
}

impl AppState {
    pub fn new(service: MatchingService) -> Self {
        Self { service }
    }
}

/// Build the router for API endpoints
pub fn build_router(state: AppState, request_timeout: Duration) -> Router {
    Router::new()
        .route("/api/v1/register-agent", post(agents::register_agent))
        .route("/api/v1/match-agent", post(agents::match_agent))
        .route("/api/v1/agents/:id", get(agents::get_agent))
        // Health check
        .route("/health", get(health::health_check))
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handle_middleware_error))
                .timeout(request_timeout),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Turns errors raised by the middleware stack into the JSON error body.
async fn handle_middleware_error(err: BoxError) -> errors::ApiError {
    if err.is::<tower::timeout::error::Elapsed>() {
        errors::ApiError::Timeout
    } else {
        agent_match_core::CoreError::Internal(format!("Unhandled middleware error: {}", err)).into()
    }
}
