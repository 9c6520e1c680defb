//! Pre-transition authorization.
//!
//! DESIGN
//! ======
//! [`evaluate`] is a pure function of a session snapshot and a [`Target`].
//! [`guard`] adds the one side effect a transition may have: lazily hydrating
//! an empty store from storage, which is what a full page reload needs.
//!
//! Rules, first match wins:
//! 1. anonymous-only route while signed in: go to the landing route
//! 2. protected route while anonymous: go to login, remembering the path
//! 3. signed in without any allowed role: go to the unauthorized page
//! 4. malformed reset-password link: go home
//!
//! The root path dispatches signed-in users to their landing route.

#[cfg(test)]
#[path = "guard_test.rs"]
mod guard_test;

use std::sync::LazyLock;

use log::debug;
use regex_lite::Regex;

use super::{RouteName, RouteRequirement};
use super::target::{REDIRECT_PARAM, Target, login_url};
use crate::state::profile::Role;
use crate::state::session::{Session, SessionStore, SharedSession};
use crate::util::storage::SessionStorage;

static RESET_TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[1-9]\d{5}$").expect("reset token pattern is valid"));

/// Whitespace as browsers define `\s`: ASCII spaces plus the Unicode space
/// separators, line/paragraph separators and BOM. `regex-lite` only knows
/// the ASCII half.
const BROWSER_WHITESPACE: &str =
    "\t\n\u{0B}\u{0C}\r \u{A0}\u{1680}\u{2000}-\u{200A}\u{2028}\u{2029}\u{202F}\u{205F}\u{3000}\u{FEFF}";
static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    let part = format!("[^{BROWSER_WHITESPACE}@]+");
    Regex::new(&format!(r"^{part}@{part}\.{part}$")).expect("email pattern is valid")
});

/// Outcome of a guarded transition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Decision {
    /// Let the transition through.
    Proceed,
    /// Send an anonymous visitor to login; `redirect` is the requested path.
    RedirectToLogin { redirect: String },
    /// Signed in, but none of the user's roles is admitted.
    RedirectToUnauthorized,
    /// Signed in; go to the role's landing route instead.
    RedirectToLanding(RouteName),
    /// Reset-password link with missing or malformed parameters.
    RedirectHome,
}

impl Decision {
    #[must_use]
    pub fn is_proceed(&self) -> bool {
        matches!(self, Self::Proceed)
    }

    /// URL to navigate to, or `None` to stay on the requested target.
    #[must_use]
    pub fn location(&self) -> Option<String> {
        match self {
            Self::Proceed => None,
            Self::RedirectToLogin { redirect } => Some(login_url(redirect)),
            Self::RedirectToUnauthorized => Some(RouteName::Unauthorized.path().to_owned()),
            Self::RedirectToLanding(route) => Some(route.path().to_owned()),
            Self::RedirectHome => Some(RouteName::Root.path().to_owned()),
        }
    }
}

/// Default route after authentication.
///
/// Fixed two-way dispatch: Admin anywhere in the role set wins, everyone else
/// lands on the employee dashboard. Revisit when roles grow beyond two.
#[must_use]
pub fn landing_route(session: &Session) -> RouteName {
    if session.has_role(Role::Admin) { RouteName::Admin } else { RouteName::Employee }
}

/// Whether `token` is a six-digit reset code in 100000..=999999.
#[must_use]
pub fn is_valid_reset_token(token: &str) -> bool {
    RESET_TOKEN_RE.is_match(token)
}

/// Minimal `local@domain.tld` shape check.
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Advisory check of a reset-password link. The server still validates both.
fn reset_link_is_well_formed(target: &Target) -> bool {
    let email = target.query_value("email").unwrap_or_default();
    let token = target.query_value("token").unwrap_or_default();
    is_valid_email(email) && is_valid_reset_token(token)
}

/// Apply the authentication and role rules of one route requirement.
#[must_use]
pub fn authorize(session: Option<&Session>, requirement: RouteRequirement, full_path: &str) -> Decision {
    match session {
        Some(session) if requirement.anonymous_only => Decision::RedirectToLanding(landing_route(session)),
        None if requirement.requires_auth => Decision::RedirectToLogin { redirect: full_path.to_owned() },
        Some(session) => match requirement.allowed_roles {
            Some(allowed) if !session.profile.has_any_role(allowed) => Decision::RedirectToUnauthorized,
            _ => Decision::Proceed,
        },
        None => Decision::Proceed,
    }
}

/// Decide a transition from a session snapshot alone.
#[must_use]
pub fn evaluate(session: Option<&Session>, target: &Target) -> Decision {
    let decision = authorize(session, target.route.requirement(), &target.full_path);
    if !decision.is_proceed() {
        return decision;
    }

    if target.route == RouteName::ResetPassword && !reset_link_is_well_formed(target) {
        return Decision::RedirectHome;
    }

    match session {
        Some(session) if target.route == RouteName::Root => Decision::RedirectToLanding(landing_route(session)),
        _ => Decision::Proceed,
    }
}

/// Authorize a transition, hydrating the store first if memory is empty.
pub fn guard<S: SessionStorage>(store: &mut SessionStore<S>, target: &Target) -> Decision {
    if store.token().is_none() {
        store.hydrate_from_storage();
    }
    let decision = evaluate(store.session(), target);
    debug!("guard: {} -> {decision:?}", target.full_path);
    decision
}

/// Authorize navigation to `url`. Paths outside the route table proceed to
/// the router's not-found fallback.
pub fn guard_url<S: SessionStorage>(session: &SharedSession<S>, url: &str) -> Decision {
    match Target::parse(url) {
        Some(target) => session.write(|store| guard(store, &target)),
        None => Decision::Proceed,
    }
}

/// Where to go after a successful login.
///
/// Honors the `redirect` parameter from the login URL when it is a local
/// absolute path that the new session may open; otherwise the landing route.
#[must_use]
pub fn post_login_location(session: &Session, login_query: &[(String, String)]) -> String {
    let landing = landing_route(session).path().to_owned();
    let Some(redirect) = login_query.iter().find(|(k, _)| k == REDIRECT_PARAM).map(|(_, v)| v.as_str()) else {
        return landing;
    };
    if !redirect.starts_with('/') || redirect.starts_with("//") || redirect.contains('\\') {
        return landing;
    }
    match Target::parse(redirect) {
        Some(target) if evaluate(Some(session), &target).is_proceed() => redirect.to_owned(),
        _ => landing,
    }
}
