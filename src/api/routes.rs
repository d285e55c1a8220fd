//! HTTP routes

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::api::handlers;
use crate::AppState;

/// Build the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/hello/", get(handlers::hello))
        .route("/styling-advice", post(handlers::styling_advice))
        .route("/chat", post(handlers::chat))
        .route("/generate-image", post(handlers::generate_image))
        .route("/match-outfit/", post(handlers::match_outfit))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
