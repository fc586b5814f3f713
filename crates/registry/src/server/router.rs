//! Axum router construction.

use std::time::Duration;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{compression::CompressionLayer, timeout::TimeoutLayer, trace::TraceLayer};

use super::{handlers, state::AppState};

/// Per-request timeout applied to all routes.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Build the application [`Router`] with all routes and middleware attached.
pub fn build(state: AppState) -> Router {
    Router::new()
        .route("/api/vehicles", post(handlers::create_vehicle))
        .route(
            "/api/vehicles/:id",
            get(handlers::get_vehicle)
                .put(handlers::update_vehicle)
                .delete(handlers::revoke_vehicle),
        )
        .route("/api/verify/:id", get(handlers::verify_vehicle))
        .route("/health", get(handlers::health))
        .fallback(handlers::not_found)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
        .layer(CompressionLayer::new())
        .with_state(state)
}
