//! Download endpoints for the brand-guide PDF and the asset ZIP.

use axum::extract::{Path, State};
use axum::http::header;
use axum::response::IntoResponse;
use chrono::Utc;

use super::AppState;
use crate::error::AppError;
use crate::export::{archive, attachment_name, pdf};
use crate::models::{BrandBranding, BrandProject, ProjectStatus};
use crate::storage::ProjectStore;

pub async fn brand_guide_pdf(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let (mut project, branding) = project_with_branding(&state.store, &id).await?;

    let store = state.store.clone();
    let project_id = id.clone();
    let bytes = tokio::task::spawn_blocking(move || {
        pdf::render_brand_guide(&store, &project_id, &branding)
    })
    .await
    .map_err(|e| AppError::Internal(format!("export task failed: {e}")))??;

    mark_exported(&state.store, &mut project).await?;
    let filename = attachment_name("Branding", project.branding_name(), "pdf");
    Ok(download(bytes, "application/pdf", &filename))
}

pub async fn contents_zip(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let (mut project, branding) = project_with_branding(&state.store, &id).await?;

    let store = state.store.clone();
    let project_id = id.clone();
    let bytes = tokio::task::spawn_blocking(move || {
        archive::build_contents_zip(&store, &project_id, &branding)
    })
    .await
    .map_err(|e| AppError::Internal(format!("export task failed: {e}")))??;

    mark_exported(&state.store, &mut project).await?;
    let filename = attachment_name("Contenidos_Marca", project.branding_name(), "zip");
    Ok(download(bytes, "application/zip", &filename))
}

async fn project_with_branding(
    store: &ProjectStore,
    id: &str,
) -> Result<(BrandProject, BrandBranding), AppError> {
    let project = store.get(id).await?;
    let branding = project
        .branding
        .clone()
        .ok_or_else(|| AppError::NotFound(format!("branding for project {id}")))?;
    Ok((project, branding))
}

async fn mark_exported(store: &ProjectStore, project: &mut BrandProject) -> Result<(), AppError> {
    project.status = ProjectStatus::Exported;
    project.updated_at = Utc::now();
    store.save(project).await
}

fn download(bytes: Vec<u8>, content_type: &str, filename: &str) -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename={filename}"),
            ),
        ],
        bytes,
    )
}
