//! Client for the platform's `/api/v1` endpoints.

use async_trait::async_trait;
use ideas::api::rest::dto::{CreateIdeaReq, IdeaDto};
use ideas::model::{Idea, NewIdea};
use modkit::TracedClient;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use thiserror::Error;
use url::Url;
use uuid::Uuid;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    /// Non-success response; `detail` is the server's message.
    #[error("{detail}")]
    Status { status: u16, detail: String },
    #[error("Network error: {0}")]
    Transport(String),
    #[error("Unexpected response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ApiError::Decode(e.to_string())
        } else {
            ApiError::Transport(e.to_string())
        }
    }
}

#[async_trait]
pub trait PlatformApi: Send + Sync {
    async fn improve_text(&self, text: &str) -> Result<String, ApiError>;
    /// Raw `form_data` object from the analysis endpoint.
    async fn analyze_idea(&self, description: &str) -> Result<Value, ApiError>;
    async fn create_idea(&self, idea: NewIdea) -> Result<Idea, ApiError>;
    async fn list_ideas(&self) -> Result<Vec<Idea>, ApiError>;
    async fn get_idea(&self, id: Uuid) -> Result<Idea, ApiError>;
    async fn upvote(&self, id: Uuid) -> Result<(), ApiError>;
    async fn downvote(&self, id: Uuid) -> Result<(), ApiError>;
}

pub struct HttpPlatformApi {
    client: TracedClient,
    base: Url,
}

impl HttpPlatformApi {
    /// `base_url` is the server root, e.g. `http://localhost:8087`.
    pub fn new(client: TracedClient, base_url: &Url) -> Self {
        let mut base = base_url.clone();
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Self { client, base }
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ApiError> {
        let url = self
            .base
            .join(path)
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        Ok(self.client.request(method, url.as_str()))
    }

    async fn call(&self, builder: RequestBuilder) -> Result<Response, ApiError> {
        let resp = self.client.send(builder).await?;
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        Err(ApiError::Status {
            status: status.as_u16(),
            detail: error_detail(status, &body),
        })
    }

    async fn json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ApiError> {
        Ok(self.call(builder).await?.json().await?)
    }
}

/// The `detail` field of an error body, or a generic line when absent.
pub fn error_detail(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("detail").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| format!("Request failed with status {}", status.as_u16()))
}

#[async_trait]
impl PlatformApi for HttpPlatformApi {
    async fn improve_text(&self, text: &str) -> Result<String, ApiError> {
        let req = self
            .request(Method::POST, "api/v1/llms/improve-text")?
            .json(&json!({ "text": text }));
        let body: Value = self.json(req).await?;
        body.get("improved_text")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| ApiError::Decode("missing improved_text".into()))
    }

    async fn analyze_idea(&self, description: &str) -> Result<Value, ApiError> {
        let req = self
            .request(Method::POST, "api/v1/agents/analyze-idea")?
            .json(&json!({ "description": description }));
        let mut body: Value = self.json(req).await?;
        match body.get_mut("form_data").map(Value::take) {
            Some(form @ Value::Object(_)) => Ok(form),
            _ => Err(ApiError::Decode("missing form_data".into())),
        }
    }

    async fn create_idea(&self, idea: NewIdea) -> Result<Idea, ApiError> {
        let req = self
            .request(Method::POST, "api/v1/ideas")?
            .json(&CreateIdeaReq::from(idea));
        let created: IdeaDto = self.json(req).await?;
        Ok(created.into())
    }

    async fn list_ideas(&self) -> Result<Vec<Idea>, ApiError> {
        let req = self.request(Method::GET, "api/v1/ideas")?;
        let ideas: Vec<IdeaDto> = self.json(req).await?;
        Ok(ideas.into_iter().map(Into::into).collect())
    }

    async fn get_idea(&self, id: Uuid) -> Result<Idea, ApiError> {
        let req = self.request(Method::GET, &format!("api/v1/ideas/{id}"))?;
        let idea: IdeaDto = self.json(req).await?;
        Ok(idea.into())
    }

    async fn upvote(&self, id: Uuid) -> Result<(), ApiError> {
        let req = self.request(Method::POST, &format!("api/v1/ideas/{id}/upvote"))?;
        self.call(req).await.map(|_| ())
    }

    async fn downvote(&self, id: Uuid) -> Result<(), ApiError> {
        let req = self.request(Method::POST, &format!("api/v1/ideas/{id}/downvote"))?;
        self.call(req).await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn api(server: &MockServer) -> HttpPlatformApi {
        let base = Url::parse(&server.base_url()).unwrap();
        HttpPlatformApi::new(TracedClient::default(), &base)
    }

    #[test]
    fn detail_is_preferred() {
        assert_eq!(
            error_detail(StatusCode::BAD_REQUEST, r#"{"detail": "Text cannot be empty"}"#),
            "Text cannot be empty"
        );
        assert_eq!(
            error_detail(StatusCode::BAD_GATEWAY, "<html>"),
            "Request failed with status 502"
        );
    }

    #[tokio::test]
    async fn improve_text_reads_improved_text() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST)
                .path("/api/v1/llms/improve-text")
                .json_body(json!({"text": "raw"}));
            then.status(200).json_body(json!({"improved_text": "Polished"}));
        });

        assert_eq!(api(&server).improve_text("raw").await.unwrap(), "Polished");
    }

    #[tokio::test]
    async fn server_errors_surface_detail() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/api/v1/llms/improve-text");
            then.status(400)
                .header("content-type", "application/problem+json")
                .json_body(json!({"title": "Bad Request", "status": 400, "detail": "Text cannot be empty"}));
        });

        let err = api(&server).improve_text("").await.unwrap_err();
        assert_eq!(
            err,
            ApiError::Status {
                status: 400,
                detail: "Text cannot be empty".into()
            }
        );
        assert_eq!(err.to_string(), "Text cannot be empty");
    }

    #[tokio::test]
    async fn analyze_returns_form_data_object() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST)
                .path("/api/v1/agents/analyze-idea")
                .json_body(json!({"description": "fog nets"}));
            then.status(200)
                .json_body(json!({"form_data": {"title": "Fog nets", "technologies": ["mesh"]}}));
        });

        let form = api(&server).analyze_idea("fog nets").await.unwrap();
        assert_eq!(form["title"], "Fog nets");
    }

    #[tokio::test]
    async fn votes_post_to_vote_paths() {
        let server = MockServer::start();
        let id = Uuid::new_v4();
        let up = server.mock(|when, then| {
            when.method(POST).path(format!("/api/v1/ideas/{id}/upvote"));
            then.status(204);
        });
        let down = server.mock(|when, then| {
            when.method(POST).path(format!("/api/v1/ideas/{id}/downvote"));
            then.status(404).json_body(json!({"detail": "Idea not found"}));
        });

        let api = api(&server);
        api.upvote(id).await.unwrap();
        let err = api.downvote(id).await.unwrap_err();
        up.assert();
        down.assert();
        assert_eq!(err.to_string(), "Idea not found");
    }
}
