use axum::http::StatusCode;
use modkit::api::problem::{Problem, ProblemResponse, ValidationError};

use crate::domain::error::DomainError;

/// Helper to create a ProblemResponse with less boilerplate
pub fn from_parts(
    status: StatusCode,
    code: &str,
    title: &str,
    detail: impl Into<String>,
    instance: &str,
) -> ProblemResponse {
    ProblemResponse(
        Problem::new(status, title, detail)
            .with_code(code)
            .with_instance(instance),
    )
}

/// Map domain error to RFC9457 ProblemResponse
pub fn map_domain_error(e: &DomainError, instance: &str) -> ProblemResponse {
    match e {
        DomainError::IdeaNotFound { .. } => from_parts(
            StatusCode::NOT_FOUND,
            "IDEA_NOT_FOUND",
            "Not Found",
            "Idea not found",
            instance,
        ),
        DomainError::MissingFields { fields } => {
            let errors = fields
                .iter()
                .map(|f| ValidationError {
                    detail: format!("{f} is required"),
                    pointer: format!("/{f}"),
                })
                .collect();
            let ProblemResponse(problem) = from_parts(
                StatusCode::BAD_REQUEST,
                "IDEA_VALIDATION",
                "Validation error",
                e.to_string(),
                instance,
            );
            ProblemResponse(problem.with_errors(errors))
        }
        DomainError::InvalidLimit { .. } | DomainError::Validation { .. } => from_parts(
            StatusCode::BAD_REQUEST,
            "IDEA_VALIDATION",
            "Validation error",
            e.to_string(),
            instance,
        ),
        DomainError::Database { .. } => {
            // Log the internal error details but don't expose them to the client
            tracing::error!(error = ?e, "Storage error occurred");
            from_parts(
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_STORAGE",
                "Internal error",
                "An internal storage error occurred",
                instance,
            )
        }
    }
}
