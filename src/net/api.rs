//! REST API client for the point-of-sale backend.
//!
//! Browser build (`csr`): real HTTP calls via `gloo-net`.
//! Native builds and tests: requests return [`ApiError::Unavailable`] since
//! these endpoints are only meaningful in the browser.
//!
//! SESSION COUPLING
//! ================
//! Every request carries `Authorization: Bearer <token>` when the shared
//! session holds one. A 401 on a request made with the session's own token
//! clears the session; the caller still gets the error, and the next
//! navigation's guard sends the user to login. Sign-in requests carry the
//! caller's credentials instead and never touch the session.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use log::warn;

use super::types::{LoginRequest, LoginResponse, ProfileResponse};
use crate::config::ApiConfig;
use crate::router::RouteName;
use crate::router::guard::landing_route;
use crate::state::profile::{Profile, ProfileError};
use crate::state::session::SharedSession;
use crate::util::storage::SessionStorage;

const LOGIN_PATH: &str = "/auth/login";
const PROFILE_PATH: &str = "/auth/me";

/// Errors produced by API calls.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request never produced a response.
    #[error("request failed: {0}")]
    Network(String),
    /// No response within the configured timeout.
    #[error("request timed out after {0} ms")]
    Timeout(u32),
    /// The server rejected the credential; the session has been cleared.
    #[error("session rejected by server")]
    Unauthorized,
    /// Any other non-success status.
    #[error("unexpected status: {0}")]
    Status(u16),
    /// The response body did not match the expected shape.
    #[error("response parse failed: {0}")]
    Parse(String),
    /// The profile violated the role contract.
    #[error("invalid profile: {0}")]
    Profile(#[from] ProfileError),
    /// Called outside the browser.
    #[error("API not available outside the browser")]
    Unavailable,
}

/// Whose credential a request carries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Credential {
    /// The shared session's token, if any.
    Session,
    /// Credentials supplied by the caller (password or a token not yet
    /// installed). The session's token is not sent.
    Caller,
}

/// HTTP client bound to the application's shared session.
pub struct ApiClient<S> {
    config: ApiConfig,
    session: SharedSession<S>,
}

impl<S> Clone for ApiClient<S> {
    fn clone(&self) -> Self {
        Self { config: self.config.clone(), session: self.session.clone() }
    }
}

/// `Authorization` header value for `token`.
#[must_use]
pub fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

impl<S: SessionStorage> ApiClient<S> {
    pub fn new(config: ApiConfig, session: SharedSession<S>) -> Self {
        Self { config, session }
    }

    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    #[must_use]
    pub fn session(&self) -> &SharedSession<S> {
        &self.session
    }

    /// Header value for the current session, if any.
    #[must_use]
    pub fn authorization_header(&self) -> Option<String> {
        self.session.token().map(|token| bearer(&token))
    }

    /// Map a response status to success or an error, clearing the session on 401.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Unauthorized`] for 401 and [`ApiError::Status`] for
    /// every other status outside 200..=299.
    pub fn handle_status(&self, status: u16) -> Result<(), ApiError> {
        self.check_status(status, Credential::Session)
    }

    pub(crate) fn check_status(&self, status: u16, credential: Credential) -> Result<(), ApiError> {
        match status {
            200..=299 => Ok(()),
            401 if credential == Credential::Session => {
                warn!("api: server answered 401, clearing session");
                self.session.logout();
                Err(ApiError::Unauthorized)
            }
            401 => Err(ApiError::Unauthorized),
            other => Err(ApiError::Status(other)),
        }
    }

    /// Exchange credentials for a token via `POST /auth/login`.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the request fails or the server rejects it.
    pub async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError> {
        self.post_json(LOGIN_PATH, request, Credential::Caller).await
    }

    /// Fetch `/auth/me` using an explicit token (before a session exists).
    ///
    /// A 401 here rejects `token` only; any current session is kept.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] on transport failure or non-success status.
    pub async fn fetch_profile_with(&self, token: &str) -> Result<ProfileResponse, ApiError> {
        self.get_json(PROFILE_PATH, Some(token)).await
    }

    /// Re-fetch the signed-in user's profile and store it.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Unauthorized`] when anonymous or when the server
    /// rejects the token (which also signs out), and [`ApiError::Profile`] for
    /// role violations.
    pub async fn refresh_profile(&self) -> Result<Profile, ApiError> {
        if !self.session.is_authenticated() {
            return Err(ApiError::Unauthorized);
        }
        let profile = Profile::try_from(self.get_json::<ProfileResponse>(PROFILE_PATH, None).await?)?;
        self.session.set_profile(profile.clone());
        Ok(profile)
    }

    /// Log in, fetch the profile, and install the session.
    ///
    /// Returns the landing route for the new session.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] from either request, or [`ApiError::Profile`]
    /// if the profile violates the role contract. Neither request is made
    /// with the session's token, so the session is unchanged on error.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<RouteName, ApiError> {
        let request = LoginRequest { email: email.to_owned(), password: password.to_owned() };
        let login = self.login(&request).await?;
        let profile = self.fetch_profile_with(&login.token).await?;
        complete_login(&self.session, login, profile)
    }

    async fn get_json<T>(&self, path: &str, token: Option<&str>) -> Result<T, ApiError>
    where
        T: serde::de::DeserializeOwned,
    {
        #[cfg(feature = "csr")]
        {
            let url = self.config.endpoint(path);
            let (auth, credential) = match token {
                Some(token) => (Some(bearer(token)), Credential::Caller),
                None => (self.authorization_header(), Credential::Session),
            };
            let mut builder = gloo_net::http::Request::get(&url);
            if let Some(value) = auth.as_deref() {
                builder = builder.header("Authorization", value);
            }
            let request = builder.build().map_err(|e| ApiError::Network(e.to_string()))?;
            self.send(request, credential).await
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = (path, token);
            Err(ApiError::Unavailable)
        }
    }

    async fn post_json<B, T>(&self, path: &str, body: &B, credential: Credential) -> Result<T, ApiError>
    where
        B: serde::Serialize,
        T: serde::de::DeserializeOwned,
    {
        #[cfg(feature = "csr")]
        {
            let url = self.config.endpoint(path);
            let mut builder = gloo_net::http::Request::post(&url);
            if credential == Credential::Session {
                if let Some(value) = self.authorization_header() {
                    builder = builder.header("Authorization", &value);
                }
            }
            let request = builder.json(body).map_err(|e| ApiError::Network(e.to_string()))?;
            self.send(request, credential).await
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = (path, body, credential);
            Err(ApiError::Unavailable)
        }
    }

    #[cfg(feature = "csr")]
    async fn send<T>(&self, request: gloo_net::http::Request, credential: Credential) -> Result<T, ApiError>
    where
        T: serde::de::DeserializeOwned,
    {
        use futures::future::{Either, select};

        let timeout_ms = self.config.timeout_ms;
        let sent = Box::pin(request.send());
        let timer = Box::pin(gloo_timers::future::TimeoutFuture::new(timeout_ms));
        let resp = match select(sent, timer).await {
            Either::Left((result, _)) => result.map_err(|e| ApiError::Network(e.to_string()))?,
            Either::Right(((), _)) => return Err(ApiError::Timeout(timeout_ms)),
        };
        self.check_status(resp.status(), credential)?;
        resp.json::<T>().await.map_err(|e| ApiError::Parse(e.to_string()))
    }
}

/// Validate the profile of a fresh login and install the session.
///
/// # Errors
///
/// Returns [`ApiError::Profile`] when the profile carries an unknown role tag
/// or no roles; the session is left untouched.
pub fn complete_login<S: SessionStorage>(
    session: &SharedSession<S>,
    login: LoginResponse,
    profile: ProfileResponse,
) -> Result<RouteName, ApiError> {
    let profile = Profile::try_from(profile)?;
    session.set_session(login.token, profile);
    session
        .snapshot()
        .map(|s| landing_route(&s))
        .ok_or(ApiError::Unauthorized)
}
