use axum::{
    http::StatusCode,
    middleware::from_fn,
    routing::{delete, get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{make_span_with_request_id, request_id_middleware};
use crate::state::AppState;

pub mod categories;
pub mod inspiration;
pub mod interactions;
pub mod onboarding;
pub mod recommendations;
pub mod titles;

/// Builds the full application router, wiring middleware around the
/// versioned API surface.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes())
        // Request ids are assigned outside the trace layer so every request
        // span carries one.
        .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
        .layer(from_fn(request_id_middleware))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Everything mounted under /api/v1.
fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/categories", get(categories::menu))
        .route("/recommendations", post(recommendations::refresh))
        .route("/recommendations/more", post(recommendations::load_more))
        .route("/onboarding", get(onboarding::starter_deck))
        .route("/inspiration", post(inspiration::deal))
        .route("/interactions", post(interactions::rate))
        .route("/interactions", delete(interactions::reset))
        .route("/interactions/undo", post(interactions::undo))
        .route("/watchlist/remove", post(interactions::remove_from_watchlist))
        .route("/titles/search", get(titles::search))
}

/// Liveness probe; answers without touching any backing service.
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
