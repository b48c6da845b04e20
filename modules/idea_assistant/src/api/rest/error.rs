use axum::http::StatusCode;
use modkit::api::problem::{Problem, ProblemResponse};

use crate::domain::error::AssistantError;

pub fn map_assistant_error(e: &AssistantError, instance: &str) -> ProblemResponse {
    let (status, code, title) = match e {
        AssistantError::EmptyText => (StatusCode::BAD_REQUEST, "TEXT_EMPTY", "Bad Request"),
        AssistantError::Llm(_) => {
            tracing::error!(error = %e, "LLM call failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "LLM_FAILURE",
                "Internal Server Error",
            )
        }
    };
    ProblemResponse(
        Problem::new(status, title, e.to_string())
            .with_code(code)
            .with_instance(instance),
    )
}
