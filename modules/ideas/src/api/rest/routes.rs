use std::sync::Arc;

use axum::routing::{get, post};
use axum::{Extension, Router};
use modkit::api::problem::{Problem, ValidationError};
use modkit::OpenApiRegistry;
use utoipa::OpenApi;

use crate::api::rest::{dto, handlers};
use crate::contract::listing::SortOrder;
use crate::contract::model::IdeaStatus;
use crate::domain::service::Service;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::list_ideas,
        handlers::get_idea,
        handlers::create_idea,
        handlers::update_idea,
        handlers::delete_idea,
        handlers::upvote_idea,
        handlers::downvote_idea,
    ),
    components(schemas(
        dto::IdeaDto,
        dto::CreateIdeaReq,
        dto::UpdateIdeaReq,
        IdeaStatus,
        SortOrder,
        Problem,
        ValidationError
    )),
    tags((name = "ideas", description = "Browse, submit and vote on ideas"))
)]
pub struct IdeasApiDoc;

pub fn register_routes(
    router: Router,
    openapi: &dyn OpenApiRegistry,
    service: Arc<Service>,
) -> anyhow::Result<Router> {
    let ideas = Router::new()
        .route(
            "/api/v1/ideas",
            get(handlers::list_ideas).post(handlers::create_idea),
        )
        .route(
            "/api/v1/ideas/{id}",
            get(handlers::get_idea)
                .put(handlers::update_idea)
                .delete(handlers::delete_idea),
        )
        .route("/api/v1/ideas/{id}/upvote", post(handlers::upvote_idea))
        .route("/api/v1/ideas/{id}/downvote", post(handlers::downvote_idea))
        .layer(Extension(service));

    openapi.register_openapi(IdeasApiDoc::openapi());
    Ok(router.merge(ideas))
}
