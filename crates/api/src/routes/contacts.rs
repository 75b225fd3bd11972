//! Contact read endpoint.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use domain::Contact;

use crate::AppState;
use crate::error::ApiError;

/// GET /contacts/{id}
#[tracing::instrument(skip(state))]
pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Contact>, ApiError> {
    state
        .contacts
        .find_contact(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("contact {id} not found")))
}
