use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::{error, info, instrument, warn};

use super::{AuthProvider, AuthState, ProfileSource, User, UserProfile};
use crate::notice::Notice;

pub const INIT_FAILED: &str = "Failed to initialize authentication";
pub const USER_CREATION_FAILED: &str = "User creation failed";

/// Owns the auth state and publishes every change to subscribers.
pub struct AuthStore {
    provider: Arc<dyn AuthProvider>,
    profiles: Arc<dyn ProfileSource>,
    state: watch::Sender<AuthState>,
    profile_delay: Duration,
}

impl AuthStore {
    pub fn new(provider: Arc<dyn AuthProvider>, profiles: Arc<dyn ProfileSource>) -> Self {
        let (state, _) = watch::channel(AuthState::default());
        Self {
            provider,
            profiles,
            state,
            profile_delay: Duration::from_millis(500),
        }
    }

    /// Pause between sign-up and the profile read, giving the backend's
    /// profile trigger time to run.
    pub fn with_profile_delay(mut self, delay: Duration) -> Self {
        self.profile_delay = delay;
        self
    }

    pub fn state(&self) -> AuthState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated()
    }

    pub fn is_curator(&self) -> bool {
        self.state.borrow().is_curator()
    }

    #[instrument(name = "portal.auth.initialize", skip_all)]
    pub async fn initialize(&self) {
        let next = match self.provider.get_session().await {
            Ok(Some(user)) => {
                let profile = self.load_profile(&user.id).await;
                AuthState::signed_in(user, profile)
            }
            Ok(None) => AuthState::signed_out(),
            Err(e) => {
                error!(error = %e, "Error initializing auth");
                AuthState {
                    error: Some(INIT_FAILED.to_string()),
                    ..AuthState::signed_out()
                }
            }
        };
        self.state.send_replace(next);
    }

    /// Apply a session change pushed by the provider.
    pub async fn handle_auth_change(&self, user: Option<User>) {
        let next = match user {
            Some(user) => {
                let profile = self.load_profile(&user.id).await;
                AuthState::signed_in(user, profile)
            }
            None => AuthState::signed_out(),
        };
        self.state.send_replace(next);
    }

    #[instrument(name = "portal.auth.sign_in", skip_all)]
    pub async fn sign_in(&self, email: &str, password: &str) -> Notice {
        self.begin(true);
        match self.provider.sign_in(email, password).await {
            Ok(user) => {
                let profile = self.load_profile(&user.id).await;
                let name = profile
                    .as_ref()
                    .map(|p| p.full_name.as_str())
                    .filter(|n| !n.is_empty())
                    .unwrap_or(email)
                    .to_string();
                self.state.send_replace(AuthState::signed_in(user, profile));
                info!("signed in");
                Notice::success(
                    "Signed in successfully",
                    Some(format!("Welcome back, {name}!")),
                )
            }
            Err(e) => self.fail("Sign in failed", e.to_string()),
        }
    }

    #[instrument(name = "portal.auth.sign_up", skip_all)]
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        full_name: &str,
        username: &str,
    ) -> Notice {
        self.begin(true);
        match self
            .provider
            .sign_up(email, password, full_name, username)
            .await
        {
            Ok(Some(user)) => {
                if !self.profile_delay.is_zero() {
                    tokio::time::sleep(self.profile_delay).await;
                }
                let profile = self.load_profile(&user.id).await;
                self.state.send_replace(AuthState::signed_in(user, profile));
                info!("signed up");
                Notice::success(
                    "Signed up successfully",
                    Some(format!("Welcome, {full_name}!")),
                )
            }
            Ok(None) => self.fail("Sign up failed", USER_CREATION_FAILED.to_string()),
            Err(e) => self.fail("Sign up failed", e.to_string()),
        }
    }

    #[instrument(name = "portal.auth.sign_out", skip_all)]
    pub async fn sign_out(&self) -> Notice {
        self.begin(false);
        match self.provider.sign_out().await {
            Ok(()) => {
                self.state.send_replace(AuthState::signed_out());
                Notice::success("Signed out successfully", None)
            }
            Err(e) => self.fail("Sign out failed", e.to_string()),
        }
    }

    fn begin(&self, clear_error: bool) {
        self.state.send_modify(|s| {
            s.is_loading = true;
            if clear_error {
                s.error = None;
            }
        });
    }

    fn fail(&self, title: &str, message: String) -> Notice {
        warn!(%message, "{title}");
        self.state.send_modify(|s| {
            s.is_loading = false;
            s.error = Some(message.clone());
        });
        Notice::failure(title, message)
    }

    /// Profile lookup failures are logged and treated as "no profile".
    async fn load_profile(&self, user_id: &str) -> Option<UserProfile> {
        match self.profiles.fetch_profile(user_id).await {
            Ok(p) => p,
            Err(e) => {
                error!(error = %e, "Error fetching user profile");
                None
            }
        }
    }
}
