use axum::{extract::State, Json};
use serde::Serialize;

use crate::{
    error::AppResult, models::RefreshOutcome, services::interactions as history, state::AppState,
};

#[derive(Debug, Serialize)]
pub struct OnboardingResponse {
    /// True once the user has seen enough films to leave the cold-start flow.
    pub complete: bool,
    #[serde(flatten)]
    pub outcome: RefreshOutcome,
}

/// Handler for the cold-start deck; also reports onboarding progress
pub async fn starter_deck(State(state): State<AppState>) -> AppResult<Json<OnboardingResponse>> {
    let interactions = state.store.get_all().await?;
    let complete = history::onboarding_complete(&interactions);
    let outcome = state.session.onboarding_batch().await;

    Ok(Json(OnboardingResponse { complete, outcome }))
}
