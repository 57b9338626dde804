use std::collections::HashSet;

use axum::{extract::State, Json};
use serde::Deserialize;

use crate::{error::AppResult, models::RefreshOutcome, state::AppState};

#[derive(Debug, Deserialize)]
pub struct InspirationRequest {
    /// Ids the client is already showing; they will not be dealt again.
    #[serde(default)]
    pub exclude_ids: Vec<u64>,
}

/// Handler for the blind-box deck
pub async fn deal(
    State(state): State<AppState>,
    Json(request): Json<InspirationRequest>,
) -> AppResult<Json<RefreshOutcome>> {
    let already_dealt: HashSet<u64> = request.exclude_ids.into_iter().collect();
    let outcome = state.session.inspiration_batch(&already_dealt).await?;
    Ok(Json(outcome))
}
