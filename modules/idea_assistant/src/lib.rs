//! AI-assisted idea submission: `/api/v1/agents/analyze-idea` turns a free
//! description into form data, `/api/v1/llms/improve-text` rewrites a
//! description for clarity. Both talk to an OpenAI-compatible endpoint
//! through the [`domain::llm::LlmClient`] port.

pub mod module;
pub use module::IdeaAssistant;

pub use config::IdeaAssistantConfig;
pub use domain::error::{AssistantError, LlmError};
pub use domain::llm::LlmClient;

#[doc(hidden)]
pub mod api;
#[doc(hidden)]
pub mod config;
#[doc(hidden)]
pub mod domain;
#[doc(hidden)]
pub mod infra;
