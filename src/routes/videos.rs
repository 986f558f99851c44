use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};

use crate::{error::AppResult, models::CatalogEntry, routes::AppState};

/// Handler for single-video lookup
pub async fn get_video(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> AppResult<Json<CatalogEntry>> {
    let entry = state.catalog.fetch_by_id(&id).await?;
    Ok(Json(entry))
}
