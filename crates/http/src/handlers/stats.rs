use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use chatvec_core::StorageStats;

use crate::AppState;
use crate::api_error::ApiError;

pub async fn get_stats(State(state): State<Arc<AppState>>) -> Result<Json<StorageStats>, ApiError> {
    state.search_service.stats().await.map(Json).map_err(|e| {
        tracing::error!("Stats error: {}", e);
        ApiError::from(e)
    })
}
