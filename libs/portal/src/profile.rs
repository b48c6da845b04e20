//! Live view of one user's profile row.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::error;

use crate::auth::{ProfileSource, User, UserProfile};

#[derive(Debug, Clone, PartialEq)]
pub struct ProfileSnapshot {
    pub profile: Option<UserProfile>,
    pub loading: bool,
    pub error: Option<String>,
}

impl Default for ProfileSnapshot {
    fn default() -> Self {
        Self {
            profile: None,
            loading: true,
            error: None,
        }
    }
}

pub struct ProfileWatcher {
    source: Arc<dyn ProfileSource>,
    user: Option<User>,
    state: watch::Sender<ProfileSnapshot>,
}

impl ProfileWatcher {
    /// Create the watcher and perform the initial fetch.
    pub async fn start(source: Arc<dyn ProfileSource>, user: Option<User>) -> Self {
        let (state, _) = watch::channel(ProfileSnapshot::default());
        let watcher = Self {
            source,
            user,
            state,
        };
        watcher.refresh().await;
        watcher
    }

    pub fn snapshot(&self) -> ProfileSnapshot {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ProfileSnapshot> {
        self.state.subscribe()
    }

    pub async fn refresh(&self) {
        let Some(user) = &self.user else {
            self.state.send_replace(ProfileSnapshot {
                profile: None,
                loading: false,
                error: None,
            });
            return;
        };

        self.state.send_modify(|s| {
            s.loading = true;
            s.error = None;
        });
        let result = self.source.fetch_profile(&user.id).await;
        self.state.send_modify(|s| {
            s.loading = false;
            match result {
                // A missing row keeps whatever was shown before.
                Ok(Some(profile)) => s.profile = Some(profile),
                Ok(None) => {}
                Err(e) => {
                    error!(error = %e, "Error fetching profile");
                    let message = e.to_string();
                    s.error = Some(if message.is_empty() {
                        "Failed to fetch user profile".to_string()
                    } else {
                        message
                    });
                }
            }
        });
    }

    /// Apply a pushed change to the watched row. Rows for other users are ignored.
    pub fn apply_change(&self, profile: UserProfile) {
        let watched = self.user.as_ref().is_some_and(|u| u.id == profile.user_id);
        if watched {
            self.state.send_modify(|s| s.profile = Some(profile));
        }
    }
}
