//! Page modules for route-level screens.
//!
//! ARCHITECTURE
//! ============
//! Pages render inside the guarded `<Router>`, so by the time one mounts the
//! current session already satisfies its route's requirement.

pub mod dashboard;
pub mod login;
pub mod module;
pub mod unauthorized;
