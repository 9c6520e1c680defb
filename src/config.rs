//! API client configuration.
//!
//! The browser bundle has no process environment, so values are captured from
//! the build environment with `option_env!` and fall back to defaults.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

pub const DEFAULT_API_BASE_URL: &str = "/api";
pub const DEFAULT_API_TIMEOUT_MS: u32 = 15_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Prefix for every API path, without a trailing slash.
    pub base_url: String,
    /// Per-request timeout in milliseconds.
    pub timeout_ms: u32,
}

impl ApiConfig {
    /// Build typed API config from build-time environment variables.
    ///
    /// Optional:
    /// - `TILL_API_URL`: default `/api`
    /// - `TILL_API_TIMEOUT_MS`: default 15000
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_values(option_env!("TILL_API_URL"), option_env!("TILL_API_TIMEOUT_MS"))
    }

    #[must_use]
    pub fn from_values(base_url: Option<&str>, timeout_ms: Option<&str>) -> Self {
        let base_url = base_url
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or(DEFAULT_API_BASE_URL)
            .trim_end_matches('/')
            .to_owned();
        Self { base_url, timeout_ms: parse_or(timeout_ms, DEFAULT_API_TIMEOUT_MS) }
    }

    /// Absolute URL for an API path such as `/auth/login`.
    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::from_values(None, None)
    }
}

fn parse_or<T>(raw: Option<&str>, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    raw.and_then(|v| v.trim().parse::<T>().ok()).unwrap_or(default)
}
