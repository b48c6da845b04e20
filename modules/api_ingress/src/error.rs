use axum::{extract::Request, http::StatusCode, response::IntoResponse};
use modkit::{Problem, ProblemResponse};

use crate::request_id::XRequestId;

/// Fallback for unmatched routes, rendered as a Problem like every other error.
pub async fn route_not_found(req: Request) -> impl IntoResponse {
    let path = req.uri().path().to_owned();
    let mut problem = Problem::new(
        StatusCode::NOT_FOUND,
        "Not Found",
        format!("No route for {path}"),
    )
    .with_code("ROUTE_NOT_FOUND")
    .with_instance(path);
    if let Some(XRequestId(id)) = req.extensions().get::<XRequestId>() {
        problem = problem.with_request_id(id.clone());
    }
    ProblemResponse(problem)
}
