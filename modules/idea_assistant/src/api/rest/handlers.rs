use std::sync::Arc;

use axum::{http::Uri, response::Json, Extension};
use modkit::api::problem::{Problem, ProblemResponse};
use modkit::ApiJson;
use tracing::info;

use crate::api::rest::dto::{AnalyzeIdeaReq, AnalyzeIdeaResp, ImproveTextReq, ImproveTextResp};
use crate::api::rest::error::map_assistant_error;
use crate::domain::service::Service;

/// Analyze a free-text idea description and return pre-filled form data.
///
/// Always answers 200; failures produce a placeholder form.
#[utoipa::path(
    post,
    path = "/api/v1/agents/analyze-idea",
    tag = "agents",
    operation_id = "idea_assistant.analyze_idea",
    request_body = AnalyzeIdeaReq,
    responses((status = 200, description = "Form data", body = AnalyzeIdeaResp))
)]
pub async fn analyze_idea(
    Extension(svc): Extension<Arc<Service>>,
    ApiJson(req): ApiJson<AnalyzeIdeaReq>,
) -> Json<AnalyzeIdeaResp> {
    info!("Analyzing idea description");
    let form_data = svc.analyze(&req.description).await;
    Json(AnalyzeIdeaResp { form_data })
}

/// Improve the clarity and structure of an idea description.
#[utoipa::path(
    post,
    path = "/api/v1/llms/improve-text",
    tag = "llms",
    operation_id = "idea_assistant.improve_text",
    request_body = ImproveTextReq,
    responses(
        (status = 200, description = "Improved text", body = ImproveTextResp),
        (status = 400, description = "Text cannot be empty", body = Problem, content_type = "application/problem+json"),
        (status = 500, description = "LLM failure", body = Problem, content_type = "application/problem+json"),
    )
)]
pub async fn improve_text(
    uri: Uri,
    Extension(svc): Extension<Arc<Service>>,
    ApiJson(req): ApiJson<ImproveTextReq>,
) -> Result<Json<ImproveTextResp>, ProblemResponse> {
    svc.improve(&req.text)
        .await
        .map(|improved_text| Json(ImproveTextResp { improved_text }))
        .map_err(|e| map_assistant_error(&e, uri.path()))
}
