//! Networking modules for the REST backend.
//!
//! SYSTEM CONTEXT
//! ==============
//! `api` handles HTTP calls and session coupling (bearer header, 401 logout);
//! `types` defines the auth wire schema.

pub mod api;
pub mod types;
