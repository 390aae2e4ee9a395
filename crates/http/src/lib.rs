//! HTTP API server for chatvec.

#![allow(clippy::missing_errors_doc, reason = "Errors are self-explanatory from Result types")]

pub mod api_error;
mod handlers;
mod query_types;
mod response_types;

use std::sync::Arc;

use axum::routing::get;
use axum::{Json, Router};
use chatvec_service::SearchService;
use tower_http::cors::CorsLayer;

pub use query_types::SearchRequest;
pub use response_types::{HealthResponse, RootResponse, SearchResponse};

/// Shared application state for all HTTP handlers.
pub struct AppState {
    /// Query embedding, ranking and stats
    pub search_service: Arc<SearchService>,
}

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route(
            "/api/v1/search",
            get(handlers::search::search_get).post(handlers::search::search_post),
        )
        .route("/api/v1/stats", get(handlers::stats::get_stats))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: "chatvec vector search API".to_owned(),
        version: env!("CARGO_PKG_VERSION").to_owned(),
    })
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "healthy".to_owned() })
}
