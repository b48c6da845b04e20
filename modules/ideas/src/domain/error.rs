use thiserror::Error;
use uuid::Uuid;

/// Domain-specific errors using thiserror
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Idea not found: {id}")]
    IdeaNotFound { id: Uuid },

    #[error("Missing required fields: {}", fields.join(", "))]
    MissingFields { fields: Vec<&'static str> },

    #[error("Invalid limit {limit}: must be between 1 and {max}")]
    InvalidLimit { limit: u32, max: u32 },

    #[error("Validation failed: {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Database error: {message}")]
    Database { message: String },
}

impl DomainError {
    pub fn idea_not_found(id: Uuid) -> Self {
        Self::IdeaNotFound { id }
    }

    pub fn missing_fields(fields: Vec<&'static str>) -> Self {
        Self::MissingFields { fields }
    }

    pub fn invalid_limit(limit: u32, max: u32) -> Self {
        Self::InvalidLimit { limit, max }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
        }
    }
}
