use std::path::PathBuf;

use crate::error::AppError;

/// Default HTTP port.
const DEFAULT_PORT: u16 = 5000;

/// Runtime configuration, loaded once at startup from the environment
/// (a `.env` file is honored via dotenvy before this runs).
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Primary Gemini API key. Startup fails without it.
    pub gemini_api_key: String,
    /// Secondary key used when the primary hits quota (429) or a 500.
    pub gemini_api_key_secondary: Option<String>,
    /// Dedicated key for Imagen calls. Falls back to the primary key.
    pub imagen_api_key: Option<String>,
    /// Port the REST server binds to.
    pub port: u16,
    /// Root directory for per-project storage.
    pub storage_dir: PathBuf,
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// `GEMINI_API_KEY` is required; everything else has a default.
    pub fn from_env() -> Result<Self, AppError> {
        let gemini_api_key = env_non_empty("GEMINI_API_KEY").ok_or_else(|| {
            AppError::Validation(
                "GEMINI_API_KEY not set. Put it in the environment or a .env file.".into(),
            )
        })?;

        let port = match env_non_empty("BRANDGEN_PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|_| AppError::Validation(format!("Invalid BRANDGEN_PORT: {raw}")))?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            gemini_api_key,
            gemini_api_key_secondary: env_non_empty("GEMINI_API_KEY_SECONDARY"),
            imagen_api_key: env_non_empty("GOOGLE_IMAGEN_API_KEY"),
            port,
            storage_dir: storage_dir_from_env(),
        })
    }
}

/// Read an env var, treating empty / whitespace-only values as unset.
fn env_non_empty(key: &str) -> Option<String> {
    match std::env::var(key) {
        Ok(v) if !v.trim().is_empty() => Some(v),
        _ => None,
    }
}

/// Resolve the storage root: `BRANDGEN_STORAGE_DIR` override, otherwise
/// `<data_dir>/brandgen/storage` (cwd-relative `storage/` as a last resort).
fn storage_dir_from_env() -> PathBuf {
    if let Some(dir) = env_non_empty("BRANDGEN_STORAGE_DIR") {
        return PathBuf::from(dir);
    }
    dirs::data_dir()
        .map(|d| d.join("brandgen").join("storage"))
        .unwrap_or_else(|| PathBuf::from("storage"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_primary_key_is_rejected() {
        std::env::remove_var("GEMINI_API_KEY");
        let err = AppConfig::from_env().unwrap_err();
        assert!(err.to_string().contains("GEMINI_API_KEY"));
    }

    #[test]
    fn test_storage_dir_override() {
        std::env::set_var("BRANDGEN_STORAGE_DIR", "/tmp/brandgen-test-store");
        assert_eq!(
            storage_dir_from_env(),
            PathBuf::from("/tmp/brandgen-test-store")
        );
        std::env::remove_var("BRANDGEN_STORAGE_DIR");
    }
}
