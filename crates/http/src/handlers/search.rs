use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};

use crate::AppState;
use crate::api_error::ApiError;
use crate::query_types::SearchRequest;
use crate::response_types::SearchResponse;

async fn run_search(state: &AppState, request: SearchRequest) -> Result<Json<SearchResponse>, ApiError> {
    let query = request.into_query()?;
    let results = state.search_service.search(&query).await?;
    Ok(Json(SearchResponse {
        total: results.len(),
        query: query.query_text,
        results,
        limit: query.limit,
        threshold: query.threshold,
    }))
}

pub async fn search_post(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SearchRequest>, JsonRejection>,
) -> Result<Json<SearchResponse>, ApiError> {
    let Json(request) = payload?;
    run_search(&state, request).await
}

pub async fn search_get(
    State(state): State<Arc<AppState>>,
    params: Result<Query<SearchRequest>, QueryRejection>,
) -> Result<Json<SearchResponse>, ApiError> {
    let Query(request) = params?;
    run_search(&state, request).await
}
