//! Route table and navigation authorization.
//!
//! ARCHITECTURE
//! ============
//! Every navigable path is declared once in [`ROUTES`] together with its
//! [`RouteRequirement`]. The guard (`guard`) decides transitions from that
//! table and a session snapshot alone; `adapter` binds it to `leptos_router`.


pub mod adapter;
pub mod guard;
pub mod target;

use crate::state::profile::Role;

/// Authorization metadata attached to a route.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RouteRequirement {
    /// Anonymous visitors are sent to login.
    pub requires_auth: bool,
    /// Roles admitted to the route; `None` admits any signed-in role.
    pub allowed_roles: Option<&'static [Role]>,
    /// Meant only for anonymous visitors (login, password recovery).
    pub anonymous_only: bool,
}

impl RouteRequirement {
    pub const PUBLIC: Self = Self { requires_auth: false, allowed_roles: None, anonymous_only: false };
    pub const ANONYMOUS_ONLY: Self = Self { requires_auth: false, allowed_roles: None, anonymous_only: true };
    pub const AUTHENTICATED: Self = Self { requires_auth: true, allowed_roles: None, anonymous_only: false };

    /// Signed-in users holding at least one of `roles`.
    #[must_use]
    pub const fn roles(roles: &'static [Role]) -> Self {
        Self { requires_auth: true, allowed_roles: Some(roles), anonymous_only: false }
    }
}

/// Named routes of the application.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RouteName {
    Root,
    Login,
    PasswordRecovery,
    ResetPassword,
    Unauthorized,
    Admin,
    CreateEmployee,
    EmployeesList,
    UpdateEmployee,
    CreateProduct,
    ProductsList,
    UpdateProduct,
    CreateSupplier,
    Employee,
    RegisterSale,
}

/// One entry of the route table.
#[derive(Clone, Copy, Debug)]
pub struct RouteDef {
    pub name: RouteName,
    /// Absolute pattern; `:name` segments match any single non-empty segment.
    pub path: &'static str,
    pub title: &'static str,
    pub requirement: RouteRequirement,
}

const ADMIN_ONLY: &[Role] = &[Role::Admin];
const EMPLOYEE_ONLY: &[Role] = &[Role::Employee];

/// Route table, in [`RouteName`] declaration order. Static patterns precede
/// parameterized siblings so `/admin/products/create` never resolves as a
/// product id.
pub const ROUTES: &[RouteDef] = &[
    RouteDef { name: RouteName::Root, path: "/", title: "Home", requirement: RouteRequirement::AUTHENTICATED },
    RouteDef {
        name: RouteName::Login,
        path: "/login",
        title: "Sign in",
        requirement: RouteRequirement::ANONYMOUS_ONLY,
    },
    RouteDef {
        name: RouteName::PasswordRecovery,
        path: "/password-recovery",
        title: "Password recovery",
        requirement: RouteRequirement::ANONYMOUS_ONLY,
    },
    RouteDef {
        name: RouteName::ResetPassword,
        path: "/reset-password",
        title: "Reset password",
        requirement: RouteRequirement::ANONYMOUS_ONLY,
    },
    RouteDef {
        name: RouteName::Unauthorized,
        path: "/unauthorized",
        title: "Not allowed",
        requirement: RouteRequirement::PUBLIC,
    },
    RouteDef {
        name: RouteName::Admin,
        path: "/admin",
        title: "Admin dashboard",
        requirement: RouteRequirement::roles(ADMIN_ONLY),
    },
    RouteDef {
        name: RouteName::CreateEmployee,
        path: "/admin/employees/create",
        title: "New employee",
        requirement: RouteRequirement::roles(ADMIN_ONLY),
    },
    RouteDef {
        name: RouteName::EmployeesList,
        path: "/employees",
        title: "Employees",
        requirement: RouteRequirement::roles(ADMIN_ONLY),
    },
    RouteDef {
        name: RouteName::UpdateEmployee,
        path: "/employees/:id",
        title: "Edit employee",
        requirement: RouteRequirement::roles(ADMIN_ONLY),
    },
    RouteDef {
        name: RouteName::CreateProduct,
        path: "/admin/products/create",
        title: "New product",
        requirement: RouteRequirement::roles(ADMIN_ONLY),
    },
    RouteDef {
        name: RouteName::ProductsList,
        path: "/admin/products",
        title: "Products",
        requirement: RouteRequirement::roles(ADMIN_ONLY),
    },
    RouteDef {
        name: RouteName::UpdateProduct,
        path: "/admin/products/:id",
        title: "Edit product",
        requirement: RouteRequirement::roles(ADMIN_ONLY),
    },
    RouteDef {
        name: RouteName::CreateSupplier,
        path: "/admin/suppliers/create",
        title: "New supplier",
        requirement: RouteRequirement::roles(ADMIN_ONLY),
    },
    RouteDef {
        name: RouteName::Employee,
        path: "/employee",
        title: "Employee dashboard",
        requirement: RouteRequirement::roles(EMPLOYEE_ONLY),
    },
    RouteDef {
        name: RouteName::RegisterSale,
        path: "/employee/sales",
        title: "Register sale",
        requirement: RouteRequirement::roles(EMPLOYEE_ONLY),
    },
];

impl RouteName {
    /// Table entry for this route.
    #[must_use]
    pub fn def(self) -> &'static RouteDef {
        // `ROUTES` is declared in variant order.
        &ROUTES[self as usize]
    }

    #[must_use]
    pub fn path(self) -> &'static str {
        self.def().path
    }

    #[must_use]
    pub fn title(self) -> &'static str {
        self.def().title
    }

    #[must_use]
    pub fn requirement(self) -> RouteRequirement {
        self.def().requirement
    }
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

fn pattern_matches(pattern: &str, path: &str) -> bool {
    let mut want = segments(pattern);
    let mut got = segments(path);
    loop {
        match (want.next(), got.next()) {
            (None, None) => return true,
            (Some(w), Some(g)) if w.starts_with(':') || w == g => {}
            _ => return false,
        }
    }
}

/// Resolve a path (without query or fragment) to its route.
#[must_use]
pub fn find_route(path: &str) -> Option<RouteName> {
    ROUTES.iter().find(|def| pattern_matches(def.path, path)).map(|def| def.name)
}
