//! Project CRUD, stored-image serving, the interview chat turn and the
//! server-side branding run.

use axum::extract::{Path, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use super::AppState;
use crate::engine::pipeline::{self, GenerationRequest};
use crate::engine::{chat, prompt};
use crate::error::AppError;
use crate::models::{BrandProject, Message, ProjectStatus};
use crate::validation::require_non_empty;

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<BrandProject>>, AppError> {
    Ok(Json(state.store.list().await?))
}

/// Upsert. Clients may post partial documents; missing ids are assigned.
pub async fn upsert(
    State(state): State<AppState>,
    Json(mut project): Json<BrandProject>,
) -> Result<Json<BrandProject>, AppError> {
    require_non_empty("name", &project.name)?;
    project.ensure_id();
    project.updated_at = Utc::now();
    state.store.save(&mut project).await?;
    tracing::debug!(project = %project.id, "Project saved");
    Ok(Json(project))
}

pub async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<BrandProject>, AppError> {
    Ok(Json(state.store.get(&id).await?))
}

pub async fn delete_one(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    if !state.store.delete(&id).await? {
        return Err(AppError::NotFound(format!("project {id}")));
    }
    tracing::info!(project = %id, "Project deleted");
    Ok(Json(json!({ "success": true })))
}

pub async fn image(
    State(state): State<AppState>,
    Path((id, name)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let path = state.store.image_path(&id, &name)?;
    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|_| AppError::NotFound(format!("image {name}")))?;
    Ok(([(header::CONTENT_TYPE, "image/png")], bytes))
}

// ----------------------------------------------------------------------
// Interview chat
// ----------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub content: String,
}

/// One interview turn: append the user message, answer it, persist both.
pub async fn chat_turn(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<Message>, AppError> {
    require_non_empty("content", &request.content)?;
    let mut project = state.store.get(&id).await?;
    project.messages.push(Message::user(request.content));

    let reply = chat::interview_reply(state.backend.as_ref(), &project.messages).await;
    let message = Message::assistant(reply);
    project.messages.push(message.clone());
    project.updated_at = Utc::now();
    state.store.save(&mut project).await?;

    Ok(Json(message))
}

// ----------------------------------------------------------------------
// Branding generation
// ----------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandingOptions {
    pub industry: Option<String>,
    pub target_audience: Option<String>,
}

/// Run the full pipeline for a project. The project sits in `generating`
/// while the pipeline runs and lands in `completed` with the stored kit.
pub async fn run_branding(
    State(state): State<AppState>,
    Path(id): Path<String>,
    options: Option<Json<BrandingOptions>>,
) -> Result<Json<BrandProject>, AppError> {
    let options = options.map(|Json(o)| o).unwrap_or_default();

    let mut project = state.store.get(&id).await?;
    project.status = ProjectStatus::Generating;
    project.updated_at = Utc::now();
    state.store.save(&mut project).await?;

    let request = GenerationRequest {
        brand_name: project.name.clone(),
        description: project.description.clone(),
        industry: options.industry,
        target_audience: options.target_audience,
        chat_context: (!project.messages.is_empty())
            .then(|| prompt::context_summary(&project.messages)),
    };
    let branding = pipeline::generate_branding(state.backend.as_ref(), &request).await;

    project.branding = Some(branding);
    project.status = ProjectStatus::Completed;
    project.can_generate = Some(false);
    project.updated_at = Utc::now();
    state.store.save(&mut project).await?;

    tracing::info!(project = %id, "Branding generated and stored");
    Ok(Json(project))
}
