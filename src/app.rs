//! Root application component with routing and context providers.

use leptos::prelude::*;
use leptos_meta::{Title, provide_meta_context};
use leptos_router::{
    ParamSegment, StaticSegment,
    components::{Route, Router, Routes},
};

use crate::config::ApiConfig;
use crate::net::api::ApiClient;
use crate::pages::{
    dashboard::{AdminDashboard, EmployeeDashboard},
    login::LoginPage,
    module::ModulePage,
    unauthorized::UnauthorizedPage,
};
use crate::router::RouteName;
use crate::router::adapter::{Guarded, RouteGuard};
use crate::state::session::SharedSession;
use crate::util::storage::BrowserStorage;

/// Session handle shared through context.
pub type AppSession = SharedSession<BrowserStorage>;

/// API client shared through context.
pub type AppApi = ApiClient<BrowserStorage>;

/// Root application component.
///
/// Restores any persisted session before the router mounts, so the first
/// guard run already sees it.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let session = AppSession::browser();
    session.hydrate_from_storage();
    let api = AppApi::new(ApiConfig::from_env(), session.clone());

    provide_context(session);
    provide_context(api);

    view! {
        <Title text="Till"/>

        <Router>
            <RouteGuard>
                <Routes fallback=|| "Page not found.".into_view()>
                    <Route path=StaticSegment("") view=|| view! { <Guarded><ModulePage route=RouteName::Root/></Guarded> }/>
                    <Route path=StaticSegment("login") view=|| view! { <Guarded><LoginPage/></Guarded> }/>
                    <Route
                        path=StaticSegment("password-recovery")
                        view=|| view! { <Guarded><ModulePage route=RouteName::PasswordRecovery/></Guarded> }
                    />
                    <Route
                        path=StaticSegment("reset-password")
                        view=|| view! { <Guarded><ModulePage route=RouteName::ResetPassword/></Guarded> }
                    />
                    <Route path=StaticSegment("unauthorized") view=|| view! { <Guarded><UnauthorizedPage/></Guarded> }/>
                    <Route path=StaticSegment("admin") view=|| view! { <Guarded><AdminDashboard/></Guarded> }/>
                    <Route
                        path=(StaticSegment("admin"), StaticSegment("employees"), StaticSegment("create"))
                        view=|| view! { <Guarded><ModulePage route=RouteName::CreateEmployee/></Guarded> }
                    />
                    <Route
                        path=StaticSegment("employees")
                        view=|| view! { <Guarded><ModulePage route=RouteName::EmployeesList/></Guarded> }
                    />
                    <Route
                        path=(StaticSegment("employees"), ParamSegment("id"))
                        view=|| view! { <Guarded><ModulePage route=RouteName::UpdateEmployee/></Guarded> }
                    />
                    <Route
                        path=(StaticSegment("admin"), StaticSegment("products"), StaticSegment("create"))
                        view=|| view! { <Guarded><ModulePage route=RouteName::CreateProduct/></Guarded> }
                    />
                    <Route
                        path=(StaticSegment("admin"), StaticSegment("products"))
                        view=|| view! { <Guarded><ModulePage route=RouteName::ProductsList/></Guarded> }
                    />
                    <Route
                        path=(StaticSegment("admin"), StaticSegment("products"), ParamSegment("id"))
                        view=|| view! { <Guarded><ModulePage route=RouteName::UpdateProduct/></Guarded> }
                    />
                    <Route
                        path=(StaticSegment("admin"), StaticSegment("suppliers"), StaticSegment("create"))
                        view=|| view! { <Guarded><ModulePage route=RouteName::CreateSupplier/></Guarded> }
                    />
                    <Route path=StaticSegment("employee") view=|| view! { <Guarded><EmployeeDashboard/></Guarded> }/>
                    <Route
                        path=(StaticSegment("employee"), StaticSegment("sales"))
                        view=|| view! { <Guarded><ModulePage route=RouteName::RegisterSale/></Guarded> }
                    />
                </Routes>
            </RouteGuard>
        </Router>
    }
}
