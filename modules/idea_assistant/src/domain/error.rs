use thiserror::Error;

/// Failures of the language-model port.
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("API key not configured (set {env})")]
    MissingApiKey { env: String },

    #[error("LLM request failed: {message}")]
    Transport { message: String },

    #[error("LLM endpoint returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("LLM response had no choices")]
    NoChoices,
}

#[derive(Error, Debug)]
pub enum AssistantError {
    #[error("Text cannot be empty")]
    EmptyText,

    #[error(transparent)]
    Llm(#[from] LlmError),
}
