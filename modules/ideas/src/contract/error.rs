use thiserror::Error;
use uuid::Uuid;

/// Errors that are safe to expose to other modules
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IdeasError {
    #[error("Idea not found: {id}")]
    NotFound { id: Uuid },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Internal error")]
    Internal,
}

impl IdeasError {
    pub fn not_found(id: Uuid) -> Self {
        Self::NotFound { id }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn internal() -> Self {
        Self::Internal
    }
}

impl From<crate::domain::error::DomainError> for IdeasError {
    fn from(domain_error: crate::domain::error::DomainError) -> Self {
        use crate::domain::error::DomainError::*;
        match domain_error {
            IdeaNotFound { id } => Self::not_found(id),
            MissingFields { fields } => {
                Self::validation(format!("Missing required fields: {}", fields.join(", ")))
            }
            InvalidLimit { limit, max } => {
                Self::validation(format!("limit must be between 1 and {max}, got {limit}"))
            }
            Validation { field, message } => Self::validation(format!("{field}: {message}")),
            Database { .. } => Self::internal(),
        }
    }
}
