use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;

use portal::auth::{AuthProvider, ProfileSource};
use portal::routes::destination_after_sign_in;
use portal::{guard, guard_location, AuthError, AuthState, AuthStore, Route, RouteDecision, User, UserProfile, UserType};

#[derive(Default)]
struct FakeProvider {
    session: Mutex<Option<User>>,
    fail_session: bool,
    reject: Option<&'static str>,
    signup_creates_user: bool,
}

fn user() -> User {
    User {
        id: "u-1".into(),
        email: Some("ada@example.com".into()),
    }
}

#[async_trait]
impl AuthProvider for FakeProvider {
    async fn get_session(&self) -> Result<Option<User>, AuthError> {
        if self.fail_session {
            return Err(AuthError::Transport("offline".into()));
        }
        Ok(self.session.lock().clone())
    }

    async fn sign_in(&self, _email: &str, _password: &str) -> Result<User, AuthError> {
        if let Some(msg) = self.reject {
            return Err(AuthError::Rejected(msg.into()));
        }
        *self.session.lock() = Some(user());
        Ok(user())
    }

    async fn sign_up(
        &self,
        _email: &str,
        _password: &str,
        _full_name: &str,
        _username: &str,
    ) -> Result<Option<User>, AuthError> {
        if let Some(msg) = self.reject {
            return Err(AuthError::Rejected(msg.into()));
        }
        Ok(self.signup_creates_user.then(user))
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        if let Some(msg) = self.reject {
            return Err(AuthError::Rejected(msg.into()));
        }
        *self.session.lock() = None;
        Ok(())
    }
}

struct Profiles(Option<UserType>);

#[async_trait]
impl ProfileSource for Profiles {
    async fn fetch_profile(&self, user_id: &str) -> Result<Option<UserProfile>, AuthError> {
        Ok(self.0.map(|kind| UserProfile {
            user_id: user_id.into(),
            email: "ada@example.com".into(),
            full_name: "Ada Lovelace".into(),
            username: "ada".into(),
            type_of_user: kind,
            credits: 3,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }))
    }
}

fn store(provider: FakeProvider, profile: Option<UserType>) -> AuthStore {
    AuthStore::new(Arc::new(provider), Arc::new(Profiles(profile)))
        .with_profile_delay(Duration::ZERO)
}

#[tokio::test]
async fn starts_loading_then_settles_signed_out() {
    let store = store(FakeProvider::default(), None);
    assert!(store.state().is_loading);

    store.initialize().await;
    assert_eq!(store.state(), AuthState::signed_out());
}

#[tokio::test]
async fn existing_session_loads_profile() {
    let provider = FakeProvider {
        session: Mutex::new(Some(user())),
        ..Default::default()
    };
    let store = store(provider, Some(UserType::Curator));
    store.initialize().await;

    assert!(store.is_authenticated());
    assert!(store.is_curator());
}

#[tokio::test]
async fn failed_initialization_sets_error() {
    let provider = FakeProvider {
        fail_session: true,
        ..Default::default()
    };
    let store = store(provider, None);
    store.initialize().await;

    let state = store.state();
    assert!(!state.is_loading);
    assert_eq!(state.error.as_deref(), Some("Failed to initialize authentication"));
}

#[tokio::test]
async fn sign_in_greets_by_name_and_notifies_subscribers() {
    let store = store(FakeProvider::default(), Some(UserType::Individual));
    store.initialize().await;
    let mut rx = store.subscribe();

    let notice = store.sign_in("ada@example.com", "pw").await;
    assert_eq!(notice.title, "Signed in successfully");
    assert_eq!(notice.description.as_deref(), Some("Welcome back, Ada Lovelace!"));
    assert!(!notice.is_destructive());

    assert!(rx.has_changed().unwrap());
    assert!(rx.borrow_and_update().is_authenticated());
    assert!(!store.is_curator());
}

#[tokio::test]
async fn sign_in_without_profile_greets_by_email() {
    let store = store(FakeProvider::default(), None);
    let notice = store.sign_in("ada@example.com", "pw").await;
    assert_eq!(notice.description.as_deref(), Some("Welcome back, ada@example.com!"));
}

#[tokio::test]
async fn rejected_sign_in_is_destructive() {
    let provider = FakeProvider {
        reject: Some("Invalid login credentials"),
        ..Default::default()
    };
    let store = store(provider, None);
    store.initialize().await;

    let notice = store.sign_in("ada@example.com", "bad").await;
    assert_eq!(notice.title, "Sign in failed");
    assert_eq!(notice.description.as_deref(), Some("Invalid login credentials"));
    assert!(notice.is_destructive());

    let state = store.state();
    assert!(!state.is_loading);
    assert!(!state.is_authenticated());
    assert_eq!(state.error.as_deref(), Some("Invalid login credentials"));
}

#[tokio::test]
async fn sign_up_outcomes() {
    let ok = store(
        FakeProvider {
            signup_creates_user: true,
            ..Default::default()
        },
        Some(UserType::Individual),
    );
    let notice = ok.sign_up("ada@example.com", "pw", "Ada Lovelace", "ada").await;
    assert_eq!(notice.title, "Signed up successfully");
    assert_eq!(notice.description.as_deref(), Some("Welcome, Ada Lovelace!"));
    assert!(ok.is_authenticated());

    let no_user = store(FakeProvider::default(), None);
    let notice = no_user.sign_up("ada@example.com", "pw", "Ada", "ada").await;
    assert_eq!(notice.title, "Sign up failed");
    assert_eq!(notice.description.as_deref(), Some("User creation failed"));
}

#[tokio::test]
async fn sign_out_clears_state() {
    let store = store(FakeProvider::default(), None);
    store.sign_in("ada@example.com", "pw").await;

    let notice = store.sign_out().await;
    assert_eq!(notice.title, "Signed out successfully");
    assert_eq!(notice.description, None);
    assert_eq!(store.state(), AuthState::signed_out());
}

#[tokio::test]
async fn protected_route_round_trip_through_sign_in() {
    let store = store(FakeProvider::default(), None);
    store.initialize().await;

    let RouteDecision::Redirect { to, from } =
        guard_location("/profile?tab=ideas", &store.state(), false)
    else {
        panic!("expected redirect");
    };
    assert_eq!(to, "/auth");

    store.sign_in("ada@example.com", "pw").await;
    let back = destination_after_sign_in(from.as_deref());
    assert_eq!(back, "/profile?tab=ideas");
    assert_eq!(Route::parse(&back), Route::Profile);
    assert_eq!(guard(&Route::parse(&back), &store.state(), false), RouteDecision::Render);
}

#[tokio::test]
async fn provider_events_update_state() {
    let store = store(FakeProvider::default(), Some(UserType::Curator));
    store.handle_auth_change(Some(user())).await;
    assert!(store.is_curator());

    store.handle_auth_change(None).await;
    assert_eq!(store.state(), AuthState::signed_out());
}
