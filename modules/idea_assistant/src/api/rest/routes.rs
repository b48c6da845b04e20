use std::sync::Arc;

use axum::routing::post;
use axum::{Extension, Router};
use ideas::form::IdeaForm;
use ideas::model::IdeaStatus;
use modkit::api::problem::Problem;
use modkit::OpenApiRegistry;
use utoipa::OpenApi;

use crate::api::rest::{dto, handlers};
use crate::domain::service::Service;

#[derive(OpenApi)]
#[openapi(
    paths(handlers::analyze_idea, handlers::improve_text),
    components(schemas(
        dto::AnalyzeIdeaReq,
        dto::AnalyzeIdeaResp,
        dto::ImproveTextReq,
        dto::ImproveTextResp,
        IdeaForm,
        IdeaStatus,
        Problem
    )),
    tags(
        (name = "agents", description = "AI-assisted form filling"),
        (name = "llms", description = "Text improvement")
    )
)]
pub struct IdeaAssistantApiDoc;

pub fn register_routes(
    router: Router,
    openapi: &dyn OpenApiRegistry,
    service: Arc<Service>,
) -> anyhow::Result<Router> {
    let assistant = Router::new()
        .route("/api/v1/agents/analyze-idea", post(handlers::analyze_idea))
        .route("/api/v1/llms/improve-text", post(handlers::improve_text))
        .layer(Extension(service));

    openapi.register_openapi(IdeaAssistantApiDoc::openapi());
    Ok(router.merge(assistant))
}
