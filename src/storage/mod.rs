//! File-based project store.
//!
//! Layout: one directory per project under the storage root, holding the
//! project document plus its extracted image assets:
//!
//! ```text
//! storage/<project_id>/project.json
//! storage/<project_id>/images/logo_main_<ts>_<nonce>.png
//! ```
//!
//! On save, base64 data URLs embedded in the branding (logos, icons) are
//! decoded to PNG files and replaced in the document by their serving URL,
//! keeping the JSON small.

use std::path::{Path, PathBuf};

use base64::Engine as _;
use rand::distributions::Alphanumeric;
use rand::Rng;

use crate::error::AppError;
use crate::models::{AppSettings, BrandBranding, BrandProject};
use crate::validation::require_safe_id;

const PROJECT_FILE: &str = "project.json";
const SETTINGS_FILE: &str = "settings.json";
const IMAGES_DIR: &str = "images";

#[derive(Clone)]
pub struct ProjectStore {
    root: PathBuf,
}

impl ProjectStore {
    /// Open (and create if needed) a store rooted at `root`.
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self, AppError> {
        let root = root.into();
        tokio::fs::create_dir_all(&root).await?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn project_dir(&self, id: &str) -> PathBuf {
        self.root.join(id)
    }

    // ------------------------------------------------------------------
    // Projects
    // ------------------------------------------------------------------

    /// Persist a project, extracting any embedded base64 images to disk.
    /// The project is mutated in place: data URLs become serving URLs.
    pub async fn save(&self, project: &mut BrandProject) -> Result<(), AppError> {
        require_safe_id("project id", &project.id)?;

        let dir = self.project_dir(&project.id);
        let images = dir.join(IMAGES_DIR);
        tokio::fs::create_dir_all(&images).await?;

        if let Some(branding) = project.branding.as_mut() {
            extract_images(&images, &project.id, branding).await;
        }

        let json = serde_json::to_vec_pretty(project)?;
        tokio::fs::write(dir.join(PROJECT_FILE), json).await?;
        Ok(())
    }

    /// All stored projects, newest first. Unreadable documents are skipped
    /// with a warning rather than failing the whole listing.
    pub async fn list(&self) -> Result<Vec<BrandProject>, AppError> {
        let mut projects = Vec::new();
        let mut entries = tokio::fs::read_dir(&self.root).await?;
        while let Some(entry) = entries.next_entry().await? {
            let file = entry.path().join(PROJECT_FILE);
            match tokio::fs::read(&file).await {
                Ok(bytes) => match serde_json::from_slice::<BrandProject>(&bytes) {
                    Ok(project) => projects.push(project),
                    Err(e) => {
                        tracing::warn!("Skipping unreadable project file {:?}: {}", file, e);
                    }
                },
                // Not a project directory (no document inside)
                Err(_) => continue,
            }
        }
        projects.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(projects)
    }

    pub async fn get(&self, id: &str) -> Result<BrandProject, AppError> {
        require_safe_id("project id", id)?;
        let file = self.project_dir(id).join(PROJECT_FILE);
        let bytes = tokio::fs::read(&file)
            .await
            .map_err(|_| AppError::NotFound(format!("project {id}")))?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Remove a project and all of its assets. Returns false when the
    /// project does not exist.
    pub async fn delete(&self, id: &str) -> Result<bool, AppError> {
        require_safe_id("project id", id)?;
        let dir = self.project_dir(id);
        if !dir.join(PROJECT_FILE).exists() {
            return Ok(false);
        }
        tokio::fs::remove_dir_all(&dir).await?;
        Ok(true)
    }

    // ------------------------------------------------------------------
    // Images
    // ------------------------------------------------------------------

    /// Physical path of a stored image, with traversal-safe components.
    pub fn image_path(&self, project_id: &str, file_name: &str) -> Result<PathBuf, AppError> {
        require_safe_id("project id", project_id)?;
        require_safe_id("image name", file_name)?;
        Ok(self.project_dir(project_id).join(IMAGES_DIR).join(file_name))
    }

    /// Resolve a branding image reference (serving URL or bare file name)
    /// to its physical path, when it points into this store.
    pub fn resolve_image(&self, project_id: &str, source: &str) -> Option<PathBuf> {
        if source.starts_with("data:") || source.starts_with("<svg") {
            return None;
        }
        let file_name = source.rsplit('/').next()?;
        let path = self.image_path(project_id, file_name).ok()?;
        path.exists().then_some(path)
    }

    // ------------------------------------------------------------------
    // Settings
    // ------------------------------------------------------------------

    pub async fn load_settings(&self) -> Result<AppSettings, AppError> {
        let file = self.root.join(SETTINGS_FILE);
        match tokio::fs::read(&file).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(_) => Ok(AppSettings::default()),
        }
    }

    pub async fn save_settings(&self, settings: &AppSettings) -> Result<(), AppError> {
        let json = serde_json::to_vec_pretty(settings)?;
        tokio::fs::write(self.root.join(SETTINGS_FILE), json).await?;
        Ok(())
    }
}

// ============================================================================
// Image extraction
// ============================================================================

/// Walk every image slot in the branding and persist embedded data URLs.
async fn extract_images(images_dir: &Path, project_id: &str, branding: &mut BrandBranding) {
    persist_data_url(images_dir, project_id, &mut branding.logo, "logo_main").await;

    for (i, icon) in branding.icons.iter_mut().enumerate() {
        let prefix = format!("icon_main_{i}");
        persist_data_url(images_dir, project_id, &mut icon.svg, &prefix).await;
    }

    for (i, proposal) in branding.proposals.iter_mut().enumerate() {
        if let Some(logo) = proposal.logo.as_mut() {
            let prefix = format!("logo_prop_{i}");
            persist_data_url(images_dir, project_id, logo, &prefix).await;
        }
        if let Some(icons) = proposal.icons.as_mut() {
            for (j, icon) in icons.iter_mut().enumerate() {
                let prefix = format!("icon_prop_{i}_{j}");
                persist_data_url(images_dir, project_id, &mut icon.svg, &prefix).await;
            }
        }
    }
}

/// Decode one `data:image/...;base64,` value to a PNG file and rewrite it
/// to its serving URL. Anything that fails leaves the value untouched.
async fn persist_data_url(images_dir: &Path, project_id: &str, value: &mut String, prefix: &str) {
    if !value.starts_with("data:image") {
        return;
    }
    let Some((_, payload)) = value.split_once(',') else {
        return;
    };

    let bytes = match base64::engine::general_purpose::STANDARD.decode(payload.trim()) {
        Ok(b) => b,
        Err(e) => {
            tracing::warn!("Failed to decode {prefix} image payload: {e}");
            return;
        }
    };

    let file_name = format!(
        "{prefix}_{}_{}.png",
        chrono::Utc::now().timestamp_millis(),
        nonce()
    );

    match tokio::fs::write(images_dir.join(&file_name), &bytes).await {
        Ok(()) => {
            *value = format!("/api/projects/{project_id}/images/{file_name}");
        }
        Err(e) => {
            tracing::warn!("Failed to write {prefix} image: {e}");
        }
    }
}

fn nonce() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(5)
        .map(char::from)
        .collect::<String>()
        .to_lowercase()
}
