pub mod handlers;
pub mod models;

use axum::{routing::get, Router};
use std::sync::Arc;

use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route(
            "/{application}/{profiles}",
            get(handlers::environment_default_label),
        )
        .route(
            "/{application}/{profiles}/{label}",
            get(handlers::environment),
        )
        .route(
            "/{application}/{profiles}/{label}/{*path}",
            get(handlers::file),
        )
        .with_state(state)
}
