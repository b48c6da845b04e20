use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use modkit::{Module, ModuleCtxBuilder, OpenApiRegistry, RestfulModule};
use serde_json::{json, Value};
use tokio_util::sync::CancellationToken;
use tower::util::ServiceExt;

use idea_assistant::{IdeaAssistant, LlmClient, LlmError};

struct NoopRegistry;

impl OpenApiRegistry for NoopRegistry {
    fn register_openapi(&self, _doc: utoipa::openapi::OpenApi) {}
}

struct FixedReply(Result<&'static str, &'static str>);

#[async_trait]
impl LlmClient for FixedReply {
    async fn complete(&self, _prompt: &str, _temperature: f32) -> Result<String, LlmError> {
        match self.0 {
            Ok(s) => Ok(s.to_string()),
            Err(m) => Err(LlmError::Transport {
                message: m.to_string(),
            }),
        }
    }
}

async fn app(reply: Result<&'static str, &'static str>) -> Router {
    let ctx = ModuleCtxBuilder::new(CancellationToken::new())
        .build()
        .for_module("idea_assistant");
    let module = IdeaAssistant::with_llm(Arc::new(FixedReply(reply)));
    module.init(&ctx).await.unwrap();
    module
        .register_rest(&ctx, Router::new(), &NoopRegistry)
        .unwrap()
}

async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let req = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn analyze_returns_form_data() {
    let app = app(Ok(r#"{"title": "Fog nets", "status": "pilot", "market_estimate": 1500}"#)).await;
    let (status, body) = post(
        &app,
        "/api/v1/agents/analyze-idea",
        json!({"description": "Collect drinking water from coastal fog"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["form_data"]["title"], "Fog nets");
    assert_eq!(body["form_data"]["status"], "pilot");
    assert_eq!(body["form_data"]["market_estimate"], 1500);
}

#[tokio::test]
async fn analyze_blank_description_asks_for_one() {
    let app = app(Ok("{}")).await;
    let (status, body) = post(&app, "/api/v1/agents/analyze-idea", json!({})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["form_data"]["title"], "Please provide a description");
}

#[tokio::test]
async fn analyze_failure_still_answers_ok() {
    let app = app(Err("connection refused")).await;
    let (status, body) = post(
        &app,
        "/api/v1/agents/analyze-idea",
        json!({"description": "Tiny idea"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["form_data"]["title"], "Error analyzing idea");
    assert_eq!(body["form_data"]["problem_statement"], "Tiny idea");
}

#[tokio::test]
async fn improve_text_round_trip() {
    let app = app(Ok("  Clean text.  ")).await;
    let (status, body) = post(&app, "/api/v1/llms/improve-text", json!({"text": "dirty txt"})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["improved_text"], "Clean text.");
}

#[tokio::test]
async fn improve_text_rejects_blank() {
    let app = app(Ok("unused")).await;
    let (status, body) = post(&app, "/api/v1/llms/improve-text", json!({"text": "  "})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Text cannot be empty");
}

#[tokio::test]
async fn improve_text_surfaces_model_errors() {
    let app = app(Err("quota exceeded")).await;
    let (status, body) = post(&app, "/api/v1/llms/improve-text", json!({"text": "idea"})).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["detail"].as_str().unwrap().contains("quota exceeded"));
}

#[tokio::test]
async fn register_before_init_fails() {
    let ctx = ModuleCtxBuilder::new(CancellationToken::new())
        .build()
        .for_module("idea_assistant");
    let err = IdeaAssistant::new()
        .register_rest(&ctx, Router::new(), &NoopRegistry)
        .unwrap_err();
    assert!(err.to_string().contains("not initialized"));
}

#[tokio::test]
async fn malformed_body_is_problem_json() {
    let app = app(Ok("unused")).await;
    let (status, body) = post(&app, "/api/v1/llms/improve-text", json!({"text": 42})).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "INVALID_REQUEST");
    assert!(body["detail"].as_str().unwrap().contains("text"));
}
