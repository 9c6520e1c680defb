//! Placeholder screen for inventory and sales modules.

use leptos::prelude::*;

use crate::router::RouteName;

/// Titled shell for a module whose forms live outside this crate.
#[component]
pub fn ModulePage(route: RouteName) -> impl IntoView {
    view! {
        <section class="module-page">
            <h1>{route.title()}</h1>
            <a class="module-page__back" href=RouteName::Root.path()>"Back to dashboard"</a>
        </section>
    }
}
