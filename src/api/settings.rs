//! Application settings, persisted next to the projects.

use axum::extract::State;
use axum::Json;

use super::AppState;
use crate::error::AppError;
use crate::models::AppSettings;

pub async fn get_settings(State(state): State<AppState>) -> Result<Json<AppSettings>, AppError> {
    Ok(Json(state.store.load_settings().await?))
}

pub async fn put_settings(
    State(state): State<AppState>,
    Json(settings): Json<AppSettings>,
) -> Result<Json<AppSettings>, AppError> {
    state.store.save_settings(&settings).await?;
    Ok(Json(settings))
}
