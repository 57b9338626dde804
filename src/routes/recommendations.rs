use axum::{extract::State, Extension, Json};
use serde::Deserialize;

use crate::{
    error::{AppError, AppResult},
    middleware::request_id::RequestId,
    models::{category_by_id, RefreshOutcome},
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    /// Menu id of the category to browse; omit for the smart mix.
    pub category_id: Option<String>,
    /// Rebuild the deck from scratch instead of extending it.
    #[serde(default)]
    pub reset: bool,
}

/// Handler for deck refresh: selects a category (None = smart mix) and
/// rebuilds or extends the deck
pub async fn refresh(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<RefreshRequest>,
) -> AppResult<Json<RefreshOutcome>> {
    let category = request
        .category_id
        .as_deref()
        .map(|id| {
            category_by_id(id)
                .copied()
                .ok_or_else(|| AppError::InvalidInput(format!("Unknown category: {id}")))
        })
        .transpose()?;

    tracing::info!(
        request_id = %request_id,
        category = category.map(|c| c.id).unwrap_or("smart"),
        reset = request.reset,
        "Processing refresh request"
    );

    let outcome = if category != state.session.selected_category().await {
        state.session.change_category(category).await?
    } else if request.reset {
        state.session.refresh(true).await?
    } else {
        state.session.load_more().await?
    };

    Ok(Json(outcome))
}

/// Handler for extending the current deck without clearing it
pub async fn load_more(State(state): State<AppState>) -> AppResult<Json<RefreshOutcome>> {
    let outcome = state.session.load_more().await?;
    Ok(Json(outcome))
}
