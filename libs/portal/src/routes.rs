//! Page routes and the access guard in front of protected pages.

use crate::auth::AuthState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Ideas,
    SubmitIdea,
    IdeaDetail(String),
    Challenges,
    KnowledgeHub,
    Community,
    Profile,
    Auth,
    Podcast,
    DeepDives,
    Resources,
    NotFound(String),
}

impl Route {
    /// Match a path; query strings and a trailing slash are ignored.
    pub fn parse(path: &str) -> Route {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let trimmed = path.trim_end_matches('/');
        let segments: Vec<&str> = trimmed.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] => Route::Home,
            ["ideas"] => Route::Ideas,
            ["ideas", "submit"] => Route::SubmitIdea,
            ["ideas", id] => Route::IdeaDetail((*id).to_string()),
            ["challenges"] => Route::Challenges,
            ["knowledge-hub"] => Route::KnowledgeHub,
            ["community"] => Route::Community,
            ["profile"] => Route::Profile,
            ["auth"] => Route::Auth,
            ["podcast"] => Route::Podcast,
            ["deep-dives"] => Route::DeepDives,
            ["resources"] => Route::Resources,
            _ => Route::NotFound(path.to_string()),
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".into(),
            Route::Ideas => "/ideas".into(),
            Route::SubmitIdea => "/ideas/submit".into(),
            Route::IdeaDetail(id) => format!("/ideas/{id}"),
            Route::Challenges => "/challenges".into(),
            Route::KnowledgeHub => "/knowledge-hub".into(),
            Route::Community => "/community".into(),
            Route::Profile => "/profile".into(),
            Route::Auth => "/auth".into(),
            Route::Podcast => "/podcast".into(),
            Route::DeepDives => "/deep-dives".into(),
            Route::Resources => "/resources".into(),
            Route::NotFound(p) => p.clone(),
        }
    }

    /// Pages that need a signed-in user.
    pub fn is_protected(&self) -> bool {
        matches!(self, Route::SubmitIdea | Route::Profile | Route::Community)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    Render,
    Loading,
    Redirect { to: String, from: Option<String> },
}

pub fn guard(route: &Route, auth: &AuthState, require_curator: bool) -> RouteDecision {
    if !route.is_protected() && !require_curator {
        return RouteDecision::Render;
    }
    if auth.is_loading {
        return RouteDecision::Loading;
    }
    if !auth.is_authenticated() {
        return RouteDecision::Redirect {
            to: Route::Auth.path(),
            from: Some(route.path()),
        };
    }
    if require_curator && !auth.is_curator() {
        return RouteDecision::Redirect {
            to: Route::Home.path(),
            from: None,
        };
    }
    RouteDecision::Render
}

/// Guard a requested location such as `/profile?tab=ideas`. The redirect to
/// sign-in keeps the full location, query and fragment included.
pub fn guard_location(location: &str, auth: &AuthState, require_curator: bool) -> RouteDecision {
    match guard(&Route::parse(location), auth, require_curator) {
        RouteDecision::Redirect { to, from: Some(_) } => RouteDecision::Redirect {
            to,
            from: Some(location.to_string()),
        },
        decision => decision,
    }
}

/// Where to go once sign-in succeeds.
pub fn destination_after_sign_in(from: Option<&str>) -> String {
    from.filter(|p| !p.is_empty())
        .unwrap_or("/")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{User, UserProfile, UserType};
    use chrono::Utc;

    fn signed_in(kind: UserType) -> AuthState {
        AuthState::signed_in(
            User {
                id: "u-1".into(),
                email: None,
            },
            Some(UserProfile {
                user_id: "u-1".into(),
                email: "a@b.c".into(),
                full_name: "Ada".into(),
                username: "ada".into(),
                type_of_user: kind,
                credits: 0,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            }),
        )
    }

    #[test]
    fn parses_known_paths() {
        assert_eq!(Route::parse("/"), Route::Home);
        assert_eq!(Route::parse("/ideas/"), Route::Ideas);
        assert_eq!(Route::parse("/ideas/submit"), Route::SubmitIdea);
        assert_eq!(Route::parse("/ideas/42"), Route::IdeaDetail("42".into()));
        assert_eq!(Route::parse("/knowledge-hub"), Route::KnowledgeHub);
        assert_eq!(Route::parse("/profile?tab=ideas"), Route::Profile);
        assert_eq!(Route::parse("/ideas/1/extra"), Route::NotFound("/ideas/1/extra".into()));
    }

    #[test]
    fn public_pages_render_while_loading() {
        assert_eq!(guard(&Route::Ideas, &AuthState::default(), false), RouteDecision::Render);
    }

    #[test]
    fn protected_pages_wait_for_auth() {
        assert_eq!(guard(&Route::Profile, &AuthState::default(), false), RouteDecision::Loading);
    }

    #[test]
    fn unauthenticated_redirect_remembers_origin() {
        let decision = guard(&Route::SubmitIdea, &AuthState::signed_out(), false);
        assert_eq!(
            decision,
            RouteDecision::Redirect {
                to: "/auth".into(),
                from: Some("/ideas/submit".into())
            }
        );
        let RouteDecision::Redirect { from, .. } = decision else {
            unreachable!()
        };
        assert_eq!(destination_after_sign_in(from.as_deref()), "/ideas/submit");
        assert_eq!(destination_after_sign_in(None), "/");
    }

    #[test]
    fn redirect_keeps_query_and_fragment() {
        let decision = guard_location("/profile?tab=ideas#top", &AuthState::signed_out(), false);
        assert_eq!(
            decision,
            RouteDecision::Redirect {
                to: "/auth".into(),
                from: Some("/profile?tab=ideas#top".into())
            }
        );
        assert_eq!(
            guard_location("/ideas?challenge=Water", &AuthState::signed_out(), false),
            RouteDecision::Render
        );
        assert_eq!(
            guard_location("/community?x=1", &signed_in(UserType::Individual), true),
            RouteDecision::Redirect {
                to: "/".into(),
                from: None
            }
        );
    }

    #[test]
    fn curator_routes_send_others_home() {
        let decision = guard(&Route::Community, &signed_in(UserType::Individual), true);
        assert_eq!(
            decision,
            RouteDecision::Redirect {
                to: "/".into(),
                from: None
            }
        );
        assert_eq!(
            guard(&Route::Community, &signed_in(UserType::Curator), true),
            RouteDecision::Render
        );
        assert_eq!(
            guard(&Route::Community, &signed_in(UserType::Individual), false),
            RouteDecision::Render
        );
    }
}
