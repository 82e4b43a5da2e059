//! HTTP API over the core transform logic.
//!
//! Stateless beyond the shared [`Renderer`]: every request is an independent
//! computation and no drafts are persisted across calls.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

use pulsewriter_core::{generate, parse_platforms, revise, DraftSet, Renderer, TransformConfig};

/// Shared application state passed to axum handlers.
#[derive(Clone)]
pub struct AppState {
    pub renderer: Arc<Renderer>,
}

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub topic: Option<String>,
    pub body_markdown: Option<String>,
    #[serde(default = "default_persona")]
    pub persona: String,
    #[serde(default = "default_tone")]
    pub tone: String,
    #[serde(default = "default_platforms")]
    pub platforms: Vec<String>,
    #[serde(default = "default_word_target")]
    pub word_target: u32,
}

fn default_persona() -> String {
    "action-oriented".to_string()
}

fn default_tone() -> String {
    "practical".to_string()
}

fn default_platforms() -> Vec<String> {
    vec!["blog".to_string(), "linkedin".to_string(), "x".to_string()]
}

fn default_word_target() -> u32 {
    600
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub draft_id: String,
    pub outputs: DraftSet,
    pub summary: String,
}

#[derive(Debug, Deserialize)]
pub struct ReviseRequest {
    pub draft_id: String,
    pub instructions: String,
    /// Accepted for schema compatibility; revision applies to all recognized
    /// drafts regardless of targets.
    pub targets: Option<Vec<String>>,
    pub drafts: DraftSet,
}

#[derive(Debug, Serialize)]
pub struct ReviseResponse {
    pub draft_id: String,
    pub outputs: DraftSet,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
}

/// Error response carrying the status that distinguishes validation failures
/// from internal ones.
struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: String) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message,
        }
    }

    fn internal(message: String) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

/// Build the axum router with all routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/generate", post(generate_handler))
        .route("/revise", post(revise_handler))
        .route("/health", get(health_handler))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Bind and serve until the process is stopped.
pub async fn serve(host: &str, port: u16, renderer: Renderer) -> Result<()> {
    let state = AppState {
        renderer: Arc::new(renderer),
    };
    let router = build_router(state);
    let listener = tokio::net::TcpListener::bind((host, port))
        .await
        .with_context(|| format!("Failed to bind {host}:{port}"))?;
    let addr = listener.local_addr().context("Failed to read local address")?;
    info!(%addr, "pulsewriter API listening");
    axum::serve(listener, router).await.context("Server error")?;
    Ok(())
}

async fn generate_handler(
    State(state): State<AppState>,
    Json(req): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>, ApiError> {
    let platforms =
        parse_platforms(&req.platforms).map_err(|e| ApiError::bad_request(e.to_string()))?;

    // Topic expansion is a stub: a real system would grow topic -> outline ->
    // body. Here the body is synthesized from the topic when absent.
    let body = req.body_markdown.unwrap_or_else(|| {
        format!(
            "{}\n\n- Why it matters\n- What to do today\n- How it compounds",
            req.topic.as_deref().unwrap_or("New Post Idea")
        )
    });

    let config = TransformConfig {
        tone: req.tone,
        persona: req.persona,
        word_target: req.word_target,
    };
    let outputs = generate(&state.renderer, &body, &platforms, &config)
        .map_err(|e| ApiError::internal(e.to_string()))?;

    let summary = if body.is_empty() {
        "Draft".to_string()
    } else {
        body.lines().next().unwrap_or("").to_string()
    };

    Ok(Json(GenerateResponse {
        draft_id: "draft-001".to_string(),
        outputs,
        summary,
    }))
}

async fn revise_handler(Json(req): Json<ReviseRequest>) -> Json<ReviseResponse> {
    if let Some(targets) = &req.targets {
        debug!(?targets, "'targets' supplied but not applied; revising all recognized drafts");
    }
    let outputs = revise(&req.drafts, &req.instructions);
    Json(ReviseResponse {
        draft_id: req.draft_id,
        outputs,
    })
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request};
    use tower::ServiceExt;

    fn app() -> Router {
        let state = AppState {
            renderer: Arc::new(Renderer::new().unwrap()),
        };
        build_router(state)
    }

    fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(resp: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(resp.into_body(), 1_000_000)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_endpoint_returns_ok() {
        let resp = app()
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let parsed = body_json(resp).await;
        assert_eq!(parsed["status"], "ok");
    }

    #[tokio::test]
    async fn generate_defaults_to_blog_linkedin_x() {
        let resp = app()
            .oneshot(post_json(
                "/generate",
                json!({ "body_markdown": "# Title\n\nBody." }),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let parsed = body_json(resp).await;
        assert_eq!(parsed["draft_id"], "draft-001");
        assert_eq!(parsed["summary"], "# Title");
        let keys: Vec<&str> = parsed["outputs"]
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(keys, vec!["blog_md", "linkedin_md", "x_thread"]);
    }

    #[tokio::test]
    async fn generate_synthesizes_body_from_topic() {
        let resp = app()
            .oneshot(post_json(
                "/generate",
                json!({ "topic": "Shipping small", "platforms": ["blog"] }),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let parsed = body_json(resp).await;
        assert_eq!(parsed["summary"], "Shipping small");
        let blog = parsed["outputs"]["blog_md"].as_str().unwrap();
        assert!(blog.contains("Shipping small"));
        assert!(blog.contains("- Why it matters"));
    }

    #[tokio::test]
    async fn generate_without_topic_or_body_uses_placeholder() {
        let resp = app()
            .oneshot(post_json("/generate", json!({ "platforms": ["x"] })))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let parsed = body_json(resp).await;
        assert_eq!(parsed["summary"], "New Post Idea");
    }

    #[tokio::test]
    async fn generate_rejects_unknown_platform_with_400() {
        let resp = app()
            .oneshot(post_json(
                "/generate",
                json!({ "body_markdown": "text", "platforms": ["blog", "myspace"] }),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let parsed = body_json(resp).await;
        assert!(parsed["error"].as_str().unwrap().contains("myspace"));
    }

    #[tokio::test]
    async fn revise_appends_marker_and_drops_unrecognized_keys() {
        let resp = app()
            .oneshot(post_json(
                "/revise",
                json!({
                    "draft_id": "draft-001",
                    "instructions": "shorter intro",
                    "drafts": { "blog_md": "first\nsecond", "raw_notes": "scratch" }
                }),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let parsed = body_json(resp).await;
        assert_eq!(parsed["draft_id"], "draft-001");
        let outputs = parsed["outputs"].as_object().unwrap();
        assert!(outputs.contains_key("blog_md"));
        assert!(!outputs.contains_key("raw_notes"));
        assert!(outputs["blog_md"]
            .as_str()
            .unwrap()
            .ends_with("<!-- Revised: shorter intro -->"));
    }

    #[tokio::test]
    async fn revise_ignores_targets() {
        let resp = app()
            .oneshot(post_json(
                "/revise",
                json!({
                    "draft_id": "d",
                    "instructions": "n",
                    "targets": ["blog_md"],
                    "drafts": { "blog_md": "a", "x_thread": "b" }
                }),
            ))
            .await
            .unwrap();
        let parsed = body_json(resp).await;
        let outputs = parsed["outputs"].as_object().unwrap();
        assert_eq!(outputs.len(), 2);
    }

    #[tokio::test]
    async fn unknown_route_returns_404() {
        let resp = app()
            .oneshot(
                Request::builder()
                    .uri("/nonexistent")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
