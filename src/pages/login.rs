//! Login page: email + password credential exchange.
//!
//! SYSTEM CONTEXT
//! ==============
//! On success the session is installed by `ApiClient::sign_in` and the user is
//! sent to the `redirect` path the guard attached to the login URL, or to the
//! landing route for their role.

#[cfg(test)]
#[path = "login_test.rs"]
mod login_test;

use leptos::prelude::*;
#[cfg(feature = "csr")]
use leptos_router::NavigateOptions;
#[cfg(feature = "csr")]
use leptos_router::hooks::use_navigate;
use leptos_router::hooks::use_location;

use crate::app::AppApi;
use crate::net::api::ApiError;

/// Trim and require both credentials.
pub(crate) fn validate_login_input(email: &str, password: &str) -> Result<(String, String), &'static str> {
    let email = email.trim();
    if email.is_empty() || password.is_empty() {
        return Err("Enter your email and password.");
    }
    Ok((email.to_owned(), password.to_owned()))
}

/// User-facing text for a failed sign-in.
pub(crate) fn sign_in_error_message(err: &ApiError) -> String {
    match err {
        ApiError::Unauthorized => "Email or password is incorrect.".to_owned(),
        ApiError::Timeout(_) | ApiError::Network(_) => "Could not reach the server. Try again.".to_owned(),
        ApiError::Profile(_) => "Your account has no valid role. Contact an administrator.".to_owned(),
        other => format!("Sign-in failed: {other}"),
    }
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let api = expect_context::<AppApi>();
    let location = use_location();
    #[cfg(feature = "csr")]
    let navigate = use_navigate();

    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let info = RwSignal::new(String::new());
    let busy = RwSignal::new(false);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        let (email_value, password_value) = match validate_login_input(&email.get(), &password.get()) {
            Ok(credentials) => credentials,
            Err(msg) => {
                info.set(msg.to_owned());
                return;
            }
        };
        busy.set(true);
        info.set("Signing in...".to_owned());
        let search = location.search.get_untracked();

        #[cfg(feature = "csr")]
        {
            let api = api.clone();
            let navigate = navigate.clone();
            leptos::task::spawn_local(async move {
                match api.sign_in(&email_value, &password_value).await {
                    Ok(_) => {
                        let query = crate::router::target::parse_query(&search);
                        if let Some(session) = api.session().snapshot() {
                            let next = crate::router::guard::post_login_location(&session, &query);
                            navigate(&next, NavigateOptions::default());
                        }
                    }
                    Err(e) => info.set(sign_in_error_message(&e)),
                }
                busy.set(false);
            });
        }

        #[cfg(not(feature = "csr"))]
        {
            let _ = (&api, search, email_value, password_value);
        }
    };

    view! {
        <div class="login-page">
            <div class="login-card">
                <h1>"Till"</h1>
                <p class="login-card__subtitle">"Sign in to continue"</p>
                <form class="login-form" on:submit=on_submit>
                    <input
                        class="login-input"
                        type="email"
                        placeholder="you@example.com"
                        prop:value=move || email.get()
                        on:input=move |ev| email.set(event_target_value(&ev))
                    />
                    <input
                        class="login-input"
                        type="password"
                        placeholder="Password"
                        prop:value=move || password.get()
                        on:input=move |ev| password.set(event_target_value(&ev))
                    />
                    <button class="login-button" type="submit" disabled=move || busy.get()>
                        "Sign In"
                    </button>
                </form>
                <Show when=move || !info.get().is_empty()>
                    <p class="login-message">{move || info.get()}</p>
                </Show>
                <a class="login-link" href="/password-recovery">"Forgot your password?"</a>
            </div>
        </div>
    }
}
