//! Request extractors whose rejections render as [`Problem`] documents.
//!
//! Drop-in replacements for axum's `Json`, `Query` and `Path`. Malformed
//! input keeps axum's status code but answers with `application/problem+json`
//! and the rejection text in `detail`.
//!
//! ```rust,ignore
//! async fn get_idea(ApiPath(id): ApiPath<Uuid>) -> Result<Json<IdeaDto>, ProblemResponse> { .. }
//! ```

use axum::{
    extract::{FromRequest, FromRequestParts, Path, Query, Request},
    http::{request::Parts, StatusCode},
    Json,
};
use serde::de::DeserializeOwned;

use crate::api::problem::{Problem, ProblemResponse};

pub const INVALID_REQUEST: &str = "INVALID_REQUEST";

fn rejected(status: StatusCode, detail: String, instance: &str) -> ProblemResponse {
    let title = status.canonical_reason().unwrap_or("Bad Request");
    tracing::debug!(%status, %detail, "request rejected");
    ProblemResponse(
        Problem::new(status, title, detail)
            .with_code(INVALID_REQUEST)
            .with_instance(instance),
    )
}

/// JSON request body.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiJson<T>(pub T);

impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ProblemResponse;

    #[allow(clippy::manual_async_fn)]
    fn from_request(
        req: Request,
        state: &S,
    ) -> impl core::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        async move {
            let instance = req.uri().path().to_owned();
            match Json::<T>::from_request(req, state).await {
                Ok(Json(value)) => Ok(ApiJson(value)),
                Err(r) => Err(rejected(r.status(), r.body_text(), &instance)),
            }
        }
    }
}

/// Query string.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ProblemResponse;

    #[allow(clippy::manual_async_fn)]
    fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> impl core::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        async move {
            match Query::<T>::from_request_parts(parts, state).await {
                Ok(Query(value)) => Ok(ApiQuery(value)),
                Err(r) => Err(rejected(r.status(), r.body_text(), parts.uri.path())),
            }
        }
    }
}

/// Path parameters.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiPath<T>(pub T);

impl<T, S> FromRequestParts<S> for ApiPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ProblemResponse;

    #[allow(clippy::manual_async_fn)]
    fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> impl core::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        async move {
            match Path::<T>::from_request_parts(parts, state).await {
                Ok(Path(value)) => Ok(ApiPath(value)),
                Err(r) => Err(rejected(r.status(), r.body_text(), parts.uri.path())),
            }
        }
    }
}
