//! Session and profile state for the signed-in user.

mod store;
mod supabase;

pub use store::AuthStore;
pub use supabase::{SupabaseAuth, SupabaseProfiles};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identity issued by the auth provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserType {
    #[default]
    Individual,
    Curator,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: String,
    pub email: String,
    pub full_name: String,
    pub username: String,
    pub type_of_user: UserType,
    #[serde(default)]
    pub credits: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AuthState {
    pub user: Option<User>,
    pub profile: Option<UserProfile>,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl Default for AuthState {
    fn default() -> Self {
        Self {
            user: None,
            profile: None,
            is_loading: true,
            error: None,
        }
    }
}

impl AuthState {
    pub fn signed_out() -> Self {
        Self {
            is_loading: false,
            ..Default::default()
        }
    }

    pub fn signed_in(user: User, profile: Option<UserProfile>) -> Self {
        Self {
            user: Some(user),
            profile,
            is_loading: false,
            error: None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn is_curator(&self) -> bool {
        self.profile
            .as_ref()
            .is_some_and(|p| p.type_of_user == UserType::Curator)
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    /// The provider refused the request; the message is shown to the user.
    #[error("{0}")]
    Rejected(String),
    #[error("{0}")]
    Transport(String),
    #[error("unexpected auth response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for AuthError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            AuthError::Decode(e.to_string())
        } else {
            AuthError::Transport(e.to_string())
        }
    }
}

/// Sign-in backend.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// The currently active session's user, if any.
    async fn get_session(&self) -> Result<Option<User>, AuthError>;
    async fn sign_in(&self, email: &str, password: &str) -> Result<User, AuthError>;
    /// `Ok(None)` when the provider accepted the request but created no user.
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        full_name: &str,
        username: &str,
    ) -> Result<Option<User>, AuthError>;
    async fn sign_out(&self) -> Result<(), AuthError>;
}

/// Reads `user_profiles` rows.
#[async_trait]
pub trait ProfileSource: Send + Sync {
    async fn fetch_profile(&self, user_id: &str) -> Result<Option<UserProfile>, AuthError>;
}
