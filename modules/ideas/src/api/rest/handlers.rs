use std::sync::Arc;

use axum::{
    http::{StatusCode, Uri},
    response::Json,
    Extension,
};
use modkit::api::problem::{Problem, ProblemResponse};
use modkit::{ApiJson, ApiPath, ApiQuery};
use tracing::{error, info};
use uuid::Uuid;

use crate::api::rest::dto::{CreateIdeaReq, IdeaDto, ListIdeasQuery, UpdateIdeaReq};
use crate::api::rest::error::map_domain_error;
use crate::domain::service::Service;

/// List ideas with optional filters, paging and ordering
#[utoipa::path(
    get,
    path = "/api/v1/ideas",
    tag = "ideas",
    operation_id = "ideas.list_ideas",
    params(ListIdeasQuery),
    responses(
        (status = 200, description = "Matching ideas", body = [IdeaDto]),
        (status = 400, description = "Bad Request", body = Problem, content_type = "application/problem+json"),
        (status = 500, description = "Internal Server Error", body = Problem, content_type = "application/problem+json"),
    )
)]
pub async fn list_ideas(
    Extension(svc): Extension<Arc<Service>>,
    ApiQuery(query): ApiQuery<ListIdeasQuery>,
    uri: Uri,
) -> Result<Json<Vec<IdeaDto>>, ProblemResponse> {
    info!("Listing ideas with query: {:?}", query);

    match svc
        .list_ideas(query.filter(), query.sort, query.limit, query.offset)
        .await
    {
        Ok(ideas) => Ok(Json(ideas.into_iter().map(IdeaDto::from).collect())),
        Err(e) => {
            error!("Failed to list ideas: {}", e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

/// Get a specific idea by ID; counts as a view
#[utoipa::path(
    get,
    path = "/api/v1/ideas/{id}",
    tag = "ideas",
    operation_id = "ideas.get_idea",
    params(("id" = Uuid, Path, description = "Idea UUID")),
    responses(
        (status = 200, description = "Idea found", body = IdeaDto),
        (status = 404, description = "Not Found", body = Problem, content_type = "application/problem+json"),
    )
)]
pub async fn get_idea(
    Extension(svc): Extension<Arc<Service>>,
    ApiPath(id): ApiPath<Uuid>,
    uri: Uri,
) -> Result<Json<IdeaDto>, ProblemResponse> {
    match svc.get_idea(id).await {
        Ok(idea) => Ok(Json(IdeaDto::from(idea))),
        Err(e) => {
            error!("Failed to get idea {}: {}", id, e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

/// Create a new idea
#[utoipa::path(
    post,
    path = "/api/v1/ideas",
    tag = "ideas",
    operation_id = "ideas.create_idea",
    request_body = CreateIdeaReq,
    responses(
        (status = 201, description = "Created idea", body = IdeaDto),
        (status = 400, description = "Bad Request", body = Problem, content_type = "application/problem+json"),
    )
)]
pub async fn create_idea(
    uri: Uri,
    Extension(svc): Extension<Arc<Service>>,
    ApiJson(req_body): ApiJson<CreateIdeaReq>,
) -> Result<(StatusCode, Json<IdeaDto>), ProblemResponse> {
    info!("Creating idea: {}", req_body.title);

    match svc.create_idea(req_body.into()).await {
        Ok(idea) => Ok((StatusCode::CREATED, Json(IdeaDto::from(idea)))),
        Err(e) => {
            error!("Failed to create idea: {}", e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

/// Update an existing idea; only the fields present in the body change
#[utoipa::path(
    put,
    path = "/api/v1/ideas/{id}",
    tag = "ideas",
    operation_id = "ideas.update_idea",
    params(("id" = Uuid, Path, description = "Idea UUID")),
    request_body = UpdateIdeaReq,
    responses(
        (status = 200, description = "Updated idea", body = IdeaDto),
        (status = 404, description = "Not Found", body = Problem, content_type = "application/problem+json"),
    )
)]
pub async fn update_idea(
    uri: Uri,
    Extension(svc): Extension<Arc<Service>>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(req_body): ApiJson<UpdateIdeaReq>,
) -> Result<Json<IdeaDto>, ProblemResponse> {
    info!("Updating idea {}", id);

    match svc.update_idea(id, req_body.into()).await {
        Ok(idea) => Ok(Json(IdeaDto::from(idea))),
        Err(e) => {
            error!("Failed to update idea {}: {}", id, e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

/// Delete an idea by ID
#[utoipa::path(
    delete,
    path = "/api/v1/ideas/{id}",
    tag = "ideas",
    operation_id = "ideas.delete_idea",
    params(("id" = Uuid, Path, description = "Idea UUID")),
    responses(
        (status = 204, description = "Idea deleted"),
        (status = 404, description = "Not Found", body = Problem, content_type = "application/problem+json"),
    )
)]
pub async fn delete_idea(
    Extension(svc): Extension<Arc<Service>>,
    ApiPath(id): ApiPath<Uuid>,
    uri: Uri,
) -> Result<StatusCode, ProblemResponse> {
    info!("Deleting idea: {}", id);

    match svc.delete_idea(id).await {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(e) => {
            error!("Failed to delete idea {}: {}", id, e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/ideas/{id}/upvote",
    tag = "ideas",
    operation_id = "ideas.upvote",
    params(("id" = Uuid, Path, description = "Idea UUID")),
    responses(
        (status = 204, description = "Vote recorded"),
        (status = 404, description = "Not Found", body = Problem, content_type = "application/problem+json"),
    )
)]
pub async fn upvote_idea(
    Extension(svc): Extension<Arc<Service>>,
    ApiPath(id): ApiPath<Uuid>,
    uri: Uri,
) -> Result<StatusCode, ProblemResponse> {
    svc.upvote(id)
        .await
        .map(|()| StatusCode::NO_CONTENT)
        .map_err(|e| map_domain_error(&e, uri.path()))
}

#[utoipa::path(
    post,
    path = "/api/v1/ideas/{id}/downvote",
    tag = "ideas",
    operation_id = "ideas.downvote",
    params(("id" = Uuid, Path, description = "Idea UUID")),
    responses(
        (status = 204, description = "Vote recorded"),
        (status = 404, description = "Not Found", body = Problem, content_type = "application/problem+json"),
    )
)]
pub async fn downvote_idea(
    Extension(svc): Extension<Arc<Service>>,
    ApiPath(id): ApiPath<Uuid>,
    uri: Uri,
) -> Result<StatusCode, ProblemResponse> {
    svc.downvote(id)
        .await
        .map(|()| StatusCode::NO_CONTENT)
        .map_err(|e| map_domain_error(&e, uri.path()))
}
