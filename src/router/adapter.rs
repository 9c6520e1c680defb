//! `leptos_router` binding for the navigation guard.
//!
//! SYSTEM CONTEXT
//! ==============
//! `leptos_router` has no before-navigation hook. `<RouteGuard>` computes the
//! guard decision for the current location as a memo, and every route view is
//! wrapped in `<Guarded>`, which only builds its children when that decision
//! is `Proceed`. A separate effect follows redirect decisions with a history
//! replace. All routing policy stays in `guard`.

#[cfg(test)]
#[path = "adapter_test.rs"]
mod adapter_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::{use_location, use_navigate};

use super::guard::{Decision, guard_url};
use super::target::join_location;
use crate::app::AppSession;
use crate::state::session::SharedSession;
use crate::util::storage::SessionStorage;

/// Guard decision for the current location, provided by `<RouteGuard>`.
#[derive(Clone, Copy)]
pub struct RouteDecision(pub Memo<Decision>);

/// Decide the router location `pathname` + `search`.
pub fn route_decision<S: SessionStorage>(session: &SharedSession<S>, pathname: &str, search: &str) -> Decision {
    guard_url(session, &join_location(pathname, search))
}

/// Follow redirect decisions, replacing the rejected history entry.
pub fn install_route_guard<F>(decision: Memo<Decision>, navigate: F)
where
    F: Fn(&str, NavigateOptions) + Clone + 'static,
{
    Effect::new(move || {
        if let Some(next) = decision.get().location() {
            navigate(&next, NavigateOptions { replace: true, ..NavigateOptions::default() });
        }
    });
}

/// Evaluates the guard for the enclosing `<Router>` and shares the decision
/// with `<Guarded>` views below it.
#[component]
pub fn RouteGuard(children: Children) -> impl IntoView {
    let session = expect_context::<AppSession>();
    let location = use_location();
    let (pathname, search) = (location.pathname, location.search);

    let decision = Memo::new(move |_| route_decision(&session, &pathname.get(), &search.get()));
    provide_context(RouteDecision(decision));
    install_route_guard(decision, use_navigate());

    children()
}

/// Builds `children` only while the current location is admitted.
#[component]
pub fn Guarded(children: ChildrenFn) -> impl IntoView {
    let RouteDecision(decision) = expect_context::<RouteDecision>();
    move || decision.get().is_proceed().then(|| children())
}
