//! REST surface: project management, generation, chat and exports.

mod export;
mod generate;
mod projects;
mod settings;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::cors::CorsLayer;

use crate::config::AppConfig;
use crate::engine::gemini::GenerativeBackend;
use crate::error::AppError;
use crate::storage::ProjectStore;

#[derive(Clone)]
pub struct AppState {
    pub store: ProjectStore,
    pub backend: Arc<dyn GenerativeBackend>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/generate", post(generate::handle))
        .route(
            "/api/projects",
            get(projects::list).post(projects::upsert),
        )
        .route(
            "/api/projects/{id}",
            get(projects::get_one).delete(projects::delete_one),
        )
        .route("/api/projects/{id}/images/{name}", get(projects::image))
        .route("/api/projects/{id}/chat", post(projects::chat_turn))
        .route("/api/projects/{id}/branding", post(projects::run_branding))
        .route("/api/projects/{id}/export/pdf", get(export::brand_guide_pdf))
        .route(
            "/api/projects/{id}/export/contents",
            get(export::contents_zip),
        )
        .route(
            "/api/settings",
            get(settings::get_settings).put(settings::put_settings),
        )
        .route("/health", get(health))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind and serve until SIGINT.
pub async fn serve(config: &AppConfig, state: AppState) -> Result<(), AppError> {
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Branding server listening on http://{}", addr);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Branding server shutting down");
        })
        .await?;
    Ok(())
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok", "service": "brandgen" }))
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};

    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::engine::fallback;
    use crate::engine::gemini::ChatTurn;
    use crate::models::BrandProject;

    /// Offline backend that records whether the project was already
    /// persisted as `generating` by the time the pipeline reached it.
    struct OfflineBackend {
        store: ProjectStore,
        project_id: String,
        saw_generating: AtomicBool,
    }

    #[async_trait]
    impl GenerativeBackend for OfflineBackend {
        async fn generate_text(&self, _prompt: &str) -> Result<String, AppError> {
            if let Ok(project) = self.store.get(&self.project_id).await {
                if project.status == crate::models::ProjectStatus::Generating {
                    self.saw_generating.store(true, Ordering::SeqCst);
                }
            }
            Err(AppError::Provider("offline".into()))
        }

        async fn generate_chat(
            &self,
            _history: &[ChatTurn],
            _system_instruction: &str,
        ) -> Result<String, AppError> {
            Err(AppError::Provider("offline".into()))
        }

        async fn generate_image(&self, _prompt: &str) -> Result<String, AppError> {
            Err(AppError::Provider("offline".into()))
        }
    }

    struct TestApp {
        _dir: tempfile::TempDir,
        store: ProjectStore,
        backend: Arc<OfflineBackend>,
        router: Router,
    }

    async fn app(project_id: &str) -> TestApp {
        let dir = tempfile::tempdir().unwrap();
        let store = ProjectStore::open(dir.path()).await.unwrap();
        let backend = Arc::new(OfflineBackend {
            store: store.clone(),
            project_id: project_id.to_string(),
            saw_generating: AtomicBool::new(false),
        });
        let router = router(AppState {
            store: store.clone(),
            backend: backend.clone() as Arc<dyn GenerativeBackend>,
        });
        TestApp {
            _dir: dir,
            store,
            backend,
            router,
        }
    }

    async fn send(
        router: &Router,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, axum::http::HeaderMap, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(value) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(value.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, headers, value)
    }

    #[tokio::test]
    async fn test_missing_project_is_structured_not_found() {
        let app = app("p1").await;
        let (status, _, body) = send(&app.router, Method::GET, "/api/projects/nope", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["kind"], "not_found");
        assert!(body["error"].as_str().unwrap().contains("nope"));
    }

    #[tokio::test]
    async fn test_blank_name_is_rejected() {
        let app = app("p1").await;
        let (status, _, body) = send(
            &app.router,
            Method::POST,
            "/api/projects",
            Some(json!({ "name": "   " })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["kind"], "validation");
    }

    #[tokio::test]
    async fn test_upsert_assigns_id_and_delete_reports_success() {
        let app = app("p1").await;
        let (status, _, body) = send(
            &app.router,
            Method::POST,
            "/api/projects",
            Some(json!({ "name": "Acme" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let id = body["id"].as_str().unwrap().to_string();
        assert!(!id.is_empty());

        let uri = format!("/api/projects/{id}");
        let (status, _, body) = send(&app.router, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);

        let (status, _, _) = send(&app.router, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_branding_run_walks_the_status_lifecycle() {
        let app = app("p1").await;
        send(
            &app.router,
            Method::POST,
            "/api/projects",
            Some(json!({ "id": "p1", "name": "Acme" })),
        )
        .await;

        let (status, _, body) =
            send(&app.router, Method::POST, "/api/projects/p1/branding", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "completed");
        assert_eq!(body["canGenerate"], false);
        assert_eq!(body["branding"]["proposals"].as_array().unwrap().len(), 5);

        // The provider saw the project persisted as generating mid-run.
        assert!(app.backend.saw_generating.load(Ordering::SeqCst));

        let stored = app.store.get("p1").await.unwrap();
        assert!(stored.branding.is_some());
    }

    #[tokio::test]
    async fn test_export_requires_branding() {
        let app = app("p1").await;
        send(
            &app.router,
            Method::POST,
            "/api/projects",
            Some(json!({ "id": "p2", "name": "Acme" })),
        )
        .await;

        let (status, _, body) = send(
            &app.router,
            Method::GET,
            "/api/projects/p2/export/contents",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["kind"], "not_found");
    }

    #[tokio::test]
    async fn test_export_download_flips_status_to_exported() {
        let app = app("p1").await;
        let mut project: BrandProject =
            serde_json::from_value(json!({ "id": "p3", "name": "Acme" })).unwrap();
        project.branding = Some(fallback::fallback_branding("Acme", "cohetes"));
        app.store.save(&mut project).await.unwrap();

        let request = Request::builder()
            .method(Method::GET)
            .uri("/api/projects/p3/export/contents")
            .body(Body::empty())
            .unwrap();
        let response = app.router.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/zip"
        );
        let disposition = response.headers()[header::CONTENT_DISPOSITION]
            .to_str()
            .unwrap();
        assert!(disposition.starts_with("attachment; filename=Contenidos_Marca_"));

        let stored = app.store.get("p3").await.unwrap();
        assert_eq!(stored.status, crate::models::ProjectStatus::Exported);
    }

    #[tokio::test]
    async fn test_health_reports_ok() {
        let app = app("p1").await;
        let (status, _, body) = send(&app.router, Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }
}
