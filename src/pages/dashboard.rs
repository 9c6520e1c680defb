//! Role dashboards.
//!
//! SYSTEM CONTEXT
//! ==============
//! `/admin` and `/employee` are the landing routes the guard dispatches to.
//! Each lists the module links its role may open and offers sign-out.

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;

use crate::app::AppSession;
use crate::router::RouteName;

const ADMIN_LINKS: &[RouteName] = &[
    RouteName::EmployeesList,
    RouteName::CreateEmployee,
    RouteName::ProductsList,
    RouteName::CreateProduct,
    RouteName::CreateSupplier,
];

const EMPLOYEE_LINKS: &[RouteName] = &[RouteName::RegisterSale];

#[component]
pub fn AdminDashboard() -> impl IntoView {
    view! { <Dashboard heading="Administration" links=ADMIN_LINKS/> }
}

#[component]
pub fn EmployeeDashboard() -> impl IntoView {
    view! { <Dashboard heading="Sales floor" links=EMPLOYEE_LINKS/> }
}

#[component]
fn Dashboard(heading: &'static str, links: &'static [RouteName]) -> impl IntoView {
    let session = expect_context::<AppSession>();
    let navigate = use_navigate();
    let user_name = session.read(|s| s.profile().map(|p| p.name.clone())).unwrap_or_default();

    let on_logout = move |_| {
        session.logout();
        navigate(RouteName::Login.path(), NavigateOptions::default());
    };

    view! {
        <div class="dashboard-page">
            <header class="dashboard-page__header">
                <h1>{heading}</h1>
                <span class="dashboard-page__user">{user_name}</span>
                <button class="btn" on:click=on_logout>"Sign out"</button>
            </header>
            <nav class="dashboard-page__links">
                {links
                    .iter()
                    .map(|route| view! { <a class="dashboard-link" href=route.path()>{route.title()}</a> })
                    .collect_view()}
            </nav>
        </div>
    }
}
