use async_trait::async_trait;

use crate::domain::error::LlmError;

/// Single-prompt text completion.
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn complete(&self, prompt: &str, temperature: f32) -> Result<String, LlmError>;
}
