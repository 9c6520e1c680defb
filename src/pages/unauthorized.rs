//! Landing screen for role mismatches.

use leptos::prelude::*;

use crate::router::RouteName;

#[component]
pub fn UnauthorizedPage() -> impl IntoView {
    view! {
        <section class="unauthorized-page">
            <h1>"Not allowed"</h1>
            <p>"Your account does not have access to that page."</p>
            <a href=RouteName::Root.path()>"Go to your dashboard"</a>
        </section>
    }
}
