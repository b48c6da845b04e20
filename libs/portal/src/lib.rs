//! Client-side behaviour of The Way Forward portal: auth and profile state,
//! theme preference, route guarding, idea browsing and the AI-assisted
//! submission flow.
//!
//! State objects are constructed explicitly and passed to whoever needs them;
//! changes that pages react to are published on `tokio::sync::watch` channels.

pub mod api;
pub mod auth;
pub mod config;
pub mod format;
pub mod listing;
pub mod notice;
pub mod profile;
pub mod routes;
pub mod submission;
pub mod theme;

pub use api::{ApiError, HttpPlatformApi, PlatformApi};
pub use auth::{AuthError, AuthState, AuthStore, User, UserProfile, UserType};
pub use config::{ConfigError, PortalConfig};
pub use notice::{Notice, NoticeVariant};
pub use routes::{guard, guard_location, Route, RouteDecision};
pub use submission::{SubmissionFlow, SubmitError};
pub use theme::{FilePreferenceStorage, MemoryPreferenceStorage, PreferenceStorage, ThemeStore};
