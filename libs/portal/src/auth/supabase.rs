//! Supabase adapters: GoTrue for sessions, PostgREST for `user_profiles`.

use async_trait::async_trait;
use modkit::TracedClient;
use parking_lot::RwLock;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};
use url::Url;

use super::{AuthError, AuthProvider, ProfileSource, User, UserProfile};

fn project_url(base_url: &str) -> anyhow::Result<Url> {
    let mut base = Url::parse(base_url)?;
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    Ok(base)
}

/// Best human message in a GoTrue/PostgREST error body.
fn error_message(status: StatusCode, body: &str) -> String {
    let parsed: Option<Value> = serde_json::from_str(body).ok();
    parsed
        .as_ref()
        .and_then(|v| {
            ["error_description", "msg", "message", "error"]
                .iter()
                .find_map(|k| v.get(*k).and_then(Value::as_str))
        })
        .map(str::to_string)
        .unwrap_or_else(|| format!("auth service returned {status}"))
}

async fn ok_or_rejected(resp: Response) -> Result<Response, AuthError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(AuthError::Rejected(error_message(status, &body)))
}

#[derive(Debug, Clone)]
struct Session {
    access_token: String,
    user: User,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    user: User,
}

/// GoTrue password auth. The session lives in memory for the life of the
/// adapter.
pub struct SupabaseAuth {
    client: TracedClient,
    base: Url,
    anon_key: String,
    session: RwLock<Option<Session>>,
}

impl SupabaseAuth {
    pub fn new(client: TracedClient, base_url: &str, anon_key: impl Into<String>) -> anyhow::Result<Self> {
        Ok(Self {
            client,
            base: project_url(base_url)?,
            anon_key: anon_key.into(),
            session: RwLock::new(None),
        })
    }

    /// Resume a session from a previously issued access token.
    pub fn with_access_token(self, access_token: impl Into<String>, user: User) -> Self {
        *self.session.write() = Some(Session {
            access_token: access_token.into(),
            user,
        });
        self
    }

    pub fn access_token(&self) -> Option<String> {
        self.session.read().as_ref().map(|s| s.access_token.clone())
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, AuthError> {
        let url = self
            .base
            .join(path)
            .map_err(|e| AuthError::Transport(e.to_string()))?;
        Ok(self
            .client
            .request(method, url.as_str())
            .header("apikey", &self.anon_key))
    }

    fn store(&self, token: TokenResponse) -> User {
        let user = token.user.clone();
        *self.session.write() = Some(Session {
            access_token: token.access_token,
            user: token.user,
        });
        user
    }
}

#[async_trait]
impl AuthProvider for SupabaseAuth {
    async fn get_session(&self) -> Result<Option<User>, AuthError> {
        let Some(token) = self.access_token() else {
            return Ok(None);
        };
        let req = self.request(Method::GET, "auth/v1/user")?.bearer_auth(&token);
        let resp = self.client.send(req).await?;
        if matches!(resp.status(), StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
            *self.session.write() = None;
            return Ok(None);
        }
        let user: User = ok_or_rejected(resp).await?.json().await?;
        if let Some(s) = self.session.write().as_mut() {
            s.user = user.clone();
        }
        Ok(Some(user))
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let req = self
            .request(Method::POST, "auth/v1/token?grant_type=password")?
            .json(&json!({ "email": email, "password": password }));
        let resp = ok_or_rejected(self.client.send(req).await?).await?;
        let token: TokenResponse = resp.json().await?;
        Ok(self.store(token))
    }

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        full_name: &str,
        username: &str,
    ) -> Result<Option<User>, AuthError> {
        let req = self.request(Method::POST, "auth/v1/signup")?.json(&json!({
            "email": email,
            "password": password,
            "data": { "full_name": full_name, "username": username }
        }));
        let resp = ok_or_rejected(self.client.send(req).await?).await?;
        let body: Value = resp.json().await?;

        // With auto-confirm the response is a session, otherwise the bare user.
        if body.get("access_token").is_some() {
            let token: TokenResponse =
                serde_json::from_value(body).map_err(|e| AuthError::Decode(e.to_string()))?;
            return Ok(Some(self.store(token)));
        }
        match body.get("id").and_then(Value::as_str) {
            Some(_) => serde_json::from_value(body)
                .map(Some)
                .map_err(|e| AuthError::Decode(e.to_string())),
            None => Ok(None),
        }
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        let Some(token) = self.access_token() else {
            return Ok(());
        };
        let req = self.request(Method::POST, "auth/v1/logout")?.bearer_auth(&token);
        ok_or_rejected(self.client.send(req).await?).await?;
        *self.session.write() = None;
        Ok(())
    }
}

/// `user_profiles` rows over PostgREST.
pub struct SupabaseProfiles {
    client: TracedClient,
    table_url: Url,
    anon_key: String,
}

impl SupabaseProfiles {
    pub fn new(client: TracedClient, base_url: &str, anon_key: impl Into<String>) -> anyhow::Result<Self> {
        Ok(Self {
            client,
            table_url: project_url(base_url)?.join("rest/v1/user_profiles")?,
            anon_key: anon_key.into(),
        })
    }
}

#[async_trait]
impl ProfileSource for SupabaseProfiles {
    async fn fetch_profile(&self, user_id: &str) -> Result<Option<UserProfile>, AuthError> {
        let mut url = self.table_url.clone();
        url.query_pairs_mut()
            .append_pair("select", "*")
            .append_pair("user_id", &format!("eq.{user_id}"));
        let req = self
            .client
            .request(Method::GET, url.as_str())
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key)
            .header("Accept", "application/vnd.pgrst.object+json");

        let resp = self.client.send(req).await?;
        // PostgREST answers 406 when the single-object request matched no row.
        if resp.status() == StatusCode::NOT_ACCEPTABLE {
            return Ok(None);
        }
        let profile = ok_or_rejected(resp).await?.json().await?;
        Ok(Some(profile))
    }
}
