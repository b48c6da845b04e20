//! OpenAI-compatible chat-completions adapter for [`LlmClient`].

use async_trait::async_trait;
use modkit::TracedClient;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::domain::error::LlmError;
use crate::domain::llm::LlmClient;

pub struct OpenAiClient {
    client: TracedClient,
    endpoint: Url,
    model: String,
    api_key: Option<String>,
    api_key_env: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: [ChatMessage<'a>; 1],
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ReplyMessage,
}

#[derive(Deserialize)]
struct ReplyMessage {
    content: Option<String>,
}

impl OpenAiClient {
    /// `base_url` points at the API root, e.g. `https://api.openai.com/v1`.
    /// A missing key is reported on the first call, not here.
    pub fn new(
        client: TracedClient,
        base_url: &str,
        model: impl Into<String>,
        api_key: Option<String>,
        api_key_env: impl Into<String>,
    ) -> anyhow::Result<Self> {
        let mut base = Url::parse(base_url)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(Self {
            client,
            endpoint: base.join("chat/completions")?,
            model: model.into(),
            api_key,
            api_key_env: api_key_env.into(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl LlmClient for OpenAiClient {
    async fn complete(&self, prompt: &str, temperature: f32) -> Result<String, LlmError> {
        let key = self.api_key.as_deref().ok_or_else(|| LlmError::MissingApiKey {
            env: self.api_key_env.clone(),
        })?;
        let body = ChatRequest {
            model: &self.model,
            temperature,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        let builder = self
            .client
            .request(Method::POST, self.endpoint.as_str())
            .bearer_auth(key)
            .json(&body);
        let resp = self.client.send(builder).await.map_err(transport)?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(LlmError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = resp.json().await.map_err(transport)?;
        let choice = parsed.choices.into_iter().next().ok_or(LlmError::NoChoices)?;
        Ok(choice.message.content.unwrap_or_default())
    }
}

fn transport(e: reqwest::Error) -> LlmError {
    LlmError::Transport {
        message: e.to_string(),
    }
}
