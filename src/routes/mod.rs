use std::sync::Arc;

use axum::{
    http::StatusCode,
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    middleware::{make_span_with_request_id, request_id_middleware},
    services::{SuggestionService, VideoCatalog},
};

pub mod suggestions;
pub mod videos;

/// Shared handler state
pub struct AppState {
    pub suggestions: Arc<SuggestionService>,
    pub catalog: Arc<dyn VideoCatalog>,
}

impl AppState {
    pub fn new(catalog: Arc<dyn VideoCatalog>, suggestions: Arc<SuggestionService>) -> Self {
        Self {
            suggestions,
            catalog,
        }
    }
}

/// Creates the application router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes())
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
                .layer(CorsLayer::permissive()),
        )
}

/// API routes under /api/v1
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/suggestions", post(suggestions::suggest))
        .route("/videos/:id", get(videos::get_video))
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
