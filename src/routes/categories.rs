use axum::{extract::State, Json};
use serde::Serialize;

use crate::{error::AppResult, models::CategoryItem, state::AppState};

#[derive(Debug, Serialize)]
pub struct CategoryResponse {
    pub id: &'static str,
    pub name: &'static str,
}

impl From<&CategoryItem> for CategoryResponse {
    fn from(item: &CategoryItem) -> Self {
        Self {
            id: item.id,
            name: item.name,
        }
    }
}

/// Handler for the category menu, ordered by taste affinity
pub async fn menu(State(state): State<AppState>) -> AppResult<Json<Vec<CategoryResponse>>> {
    let ordered = state.session.category_menu(state.categories).await?;
    Ok(Json(ordered.iter().map(CategoryResponse::from).collect()))
}
