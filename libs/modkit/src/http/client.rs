//! Traced HTTP client for upstream calls (PostgREST, LLM endpoints).
//!
//! Every request runs inside an `outgoing_http` span and carries an
//! `x-request-id` header so upstream logs can be correlated with ours.

use reqwest::header::{HeaderName, HeaderValue};
use tracing::{field::Empty, Instrument};

pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

#[derive(Clone)]
pub struct TracedClient {
    inner: reqwest::Client,
}

impl TracedClient {
    pub fn new(inner: reqwest::Client) -> Self {
        Self { inner }
    }

    /// Execute a built request, adding `x-request-id` when the caller did not set one.
    pub async fn execute(&self, mut req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
        if !req.headers().contains_key(&REQUEST_ID_HEADER) {
            if let Ok(v) = HeaderValue::from_str(&nanoid::nanoid!()) {
                req.headers_mut().insert(REQUEST_ID_HEADER, v);
            }
        }
        let request_id = req
            .headers()
            .get(&REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_owned();

        let span = tracing::info_span!(
            "outgoing_http",
            http.method = %req.method(),
            http.url = %req.url(),
            request_id = %request_id,
            http.status_code = Empty,
            error = Empty,
        );

        async {
            let response = self.inner.execute(req).await?;
            let status = response.status();
            tracing::Span::current().record("http.status_code", status.as_u16());
            if status.is_client_error() || status.is_server_error() {
                tracing::Span::current().record("error", true);
                tracing::debug!(%status, "upstream returned error status");
            }
            Ok(response)
        }
        .instrument(span)
        .await
    }

    pub async fn get(&self, url: &str) -> reqwest::Result<reqwest::Response> {
        let req = self.inner.get(url).build()?;
        self.execute(req).await
    }

    /// Start a request; finish it with [`TracedClient::send`].
    pub fn request(&self, method: reqwest::Method, url: &str) -> reqwest::RequestBuilder {
        self.inner.request(method, url)
    }

    pub async fn send(&self, builder: reqwest::RequestBuilder) -> reqwest::Result<reqwest::Response> {
        let req = builder.build()?;
        self.execute(req).await
    }

    pub fn inner(&self) -> &reqwest::Client {
        &self.inner
    }
}

impl From<reqwest::Client> for TracedClient {
    fn from(c: reqwest::Client) -> Self {
        Self::new(c)
    }
}

impl Default for TracedClient {
    fn default() -> Self {
        Self::new(reqwest::Client::new())
    }
}
