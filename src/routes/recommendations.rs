use axum::{extract::State, Json};
use serde::Deserialize;

use crate::{error::AppResult, models::RecommendOutcome, routes::AppState};

#[derive(Debug, Deserialize)]
pub struct RecommendRequest {
    /// Transcribed utterance; a missing field counts as an empty query
    #[serde(default)]
    pub text: String,
}

/// Handler for the recommendation endpoint
pub async fn recommend(
    State(state): State<AppState>,
    Json(request): Json<RecommendRequest>,
) -> AppResult<Json<RecommendOutcome>> {
    let outcome = state.recommender.recommend(&request.text)?;
    Ok(Json(outcome))
}
