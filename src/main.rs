use std::sync::Arc;

use brandgen_server::api::{self, AppState};
use brandgen_server::config::AppConfig;
use brandgen_server::engine::gemini::{GeminiClient, GenerativeBackend};
use brandgen_server::error::AppError;
use brandgen_server::logging;
use brandgen_server::storage::ProjectStore;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    logging::init();

    let config = AppConfig::from_env()?;
    tracing::info!(storage = %config.storage_dir.display(), "Starting brandgen server");

    let store = ProjectStore::open(&config.storage_dir).await?;
    let backend: Arc<dyn GenerativeBackend> = Arc::new(GeminiClient::new(&config));

    let state = AppState { store, backend };
    api::serve(&config, state).await
}
