//! Shared client-side state modules.
//!
//! DESIGN
//! ======
//! `profile` holds the identity/role model, `session` the persisted store that
//! the guard, HTTP client and pages share.

pub mod profile;
pub mod session;
