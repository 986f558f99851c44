use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::Deserialize;

use crate::{error::AppResult, models::SuggestionOutcome, routes::AppState};

#[derive(Debug, Deserialize)]
pub struct SuggestionRequest {
    pub moods: Vec<String>,
    pub target_minutes: u32,
}

/// Handler for the suggestion endpoint
pub async fn suggest(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SuggestionRequest>, JsonRejection>,
) -> AppResult<Json<SuggestionOutcome>> {
    let Json(request) = payload?;
    let outcome = state
        .suggestions
        .get_suggestion(request.moods, request.target_minutes)
        .await?;
    Ok(Json(outcome))
}
