use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;

use crate::{
    error::AppResult,
    models::{CandidateMovie, Interaction, RatingAction},
    services::interactions as history,
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct RateRequest {
    pub movie: CandidateMovie,
    pub action: RatingAction,
}

#[derive(Debug, Deserialize)]
pub struct MovieIdRequest {
    pub movie_id: u64,
}

/// Handler for rating gestures; the rated card leaves the live deck
pub async fn rate(
    State(state): State<AppState>,
    Json(request): Json<RateRequest>,
) -> AppResult<Json<Interaction>> {
    let record =
        history::apply_rating(state.store.as_ref(), &request.movie, request.action).await?;
    state.session.remove_from_batch(request.movie.id).await;
    Ok(Json(record))
}

/// Handler for clearing a rating; watchlist membership survives
pub async fn undo(
    State(state): State<AppState>,
    Json(request): Json<MovieIdRequest>,
) -> AppResult<Json<Option<Interaction>>> {
    let record = history::undo_rating(state.store.as_ref(), request.movie_id).await?;
    Ok(Json(record))
}

/// Handler for dropping a film from the watchlist
pub async fn remove_from_watchlist(
    State(state): State<AppState>,
    Json(request): Json<MovieIdRequest>,
) -> AppResult<Json<Option<Interaction>>> {
    let record = history::remove_from_watchlist(state.store.as_ref(), request.movie_id).await?;
    Ok(Json(record))
}

/// Handler for wiping the whole interaction history
pub async fn reset(State(state): State<AppState>) -> AppResult<StatusCode> {
    history::reset_all(state.store.as_ref()).await?;
    Ok(StatusCode::NO_CONTENT)
}
