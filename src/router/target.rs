//! Navigation targets: a resolved route plus the URL pieces the guard needs.

#[cfg(test)]
#[path = "target_test.rs"]
mod target_test;

use url::form_urlencoded;

use super::{RouteName, find_route};

/// Query-string parameter carrying the originally requested path to login.
pub const REDIRECT_PARAM: &str = "redirect";

/// A route transition the guard is asked to authorize.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Target {
    pub route: RouteName,
    /// Path plus query (and fragment) exactly as requested.
    pub full_path: String,
    /// Decoded query pairs in order of appearance.
    pub query: Vec<(String, String)>,
}

impl Target {
    /// Resolve `url` (`/path?query#fragment`) against the route table.
    ///
    /// Returns `None` for paths no route matches.
    #[must_use]
    pub fn parse(url: &str) -> Option<Self> {
        let without_fragment = url.split_once('#').map_or(url, |(head, _)| head);
        let (path, query) = without_fragment.split_once('?').unwrap_or((without_fragment, ""));
        let route = find_route(path)?;
        Some(Self { route, full_path: url.to_owned(), query: parse_query(query) })
    }

    /// A target for `route` with no query.
    #[must_use]
    pub fn for_route(route: RouteName) -> Self {
        Self { route, full_path: route.path().to_owned(), query: Vec::new() }
    }

    /// First value of `key`; repeated keys keep the earliest value.
    #[must_use]
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }
}

/// Decode an `application/x-www-form-urlencoded` query (leading `?` optional).
#[must_use]
pub fn parse_query(query: &str) -> Vec<(String, String)> {
    let query = query.strip_prefix('?').unwrap_or(query);
    form_urlencoded::parse(query.as_bytes()).into_owned().collect()
}

/// URL of the login page carrying `redirect` back to the requested path.
#[must_use]
pub fn login_url(redirect: &str) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair(REDIRECT_PARAM, redirect)
        .finish();
    format!("{}?{query}", RouteName::Login.path())
}

/// Join a router pathname and search string into one URL.
#[must_use]
pub fn join_location(pathname: &str, search: &str) -> String {
    let search = search.strip_prefix('?').unwrap_or(search);
    if search.is_empty() { pathname.to_owned() } else { format!("{pathname}?{search}") }
}
