//! Category catalogue endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use domain::Category;
use serde::Deserialize;

use crate::AppState;
use crate::error::ApiError;

#[derive(Deserialize)]
pub struct CreateCategoryRequest {
    pub name: String,
}

/// POST /categories: adds a category that suppliers can be linked to.
#[tracing::instrument(skip(state, req))]
pub async fn create(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateCategoryRequest>,
) -> Result<(StatusCode, Json<Category>), ApiError> {
    let category = Category::new(0, req.name.trim());
    category.validate_new()?;

    let created = state.categories.create_category(&category).await?;
    tracing::info!(category_id = created.id, "category created");
    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /categories
pub async fn list(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Category>>, ApiError> {
    Ok(Json(state.categories.list_categories().await?))
}
