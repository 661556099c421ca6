//! Route definitions.

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;

use crate::config::ServerConfig;
use crate::handlers::{self, AppState};

/// Create the API router.
pub fn create_router(config: ServerConfig) -> Router {
    let state = Arc::new(AppState { config });

    Router::new()
        .route("/health", get(handlers::health))
        .route("/calculate", post(handlers::calculate))
        .with_state(state)
}
