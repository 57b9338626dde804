use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::{error::AppResult, models::CandidateMovie, services::title_search, state::AppState};

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    q: String,
}

/// Handler for the title search endpoint. Results are poster-bearing films
/// only, ordered as the catalog ranked them.
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<Vec<CandidateMovie>>> {
    let results = title_search::search_titles(Arc::clone(&state.provider), &params.q).await?;
    Ok(Json(results))
}
