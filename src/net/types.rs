//! Auth API DTOs for the client/server boundary.
//!
//! DESIGN
//! ======
//! Response shapes mirror the backend exactly (including its field names);
//! conversion into domain types happens in one `TryFrom` step so unknown role
//! tags are rejected before they can reach the session store.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use log::error;
use serde::{Deserialize, Serialize};

use crate::state::profile::{Profile, ProfileError, Role};

/// Body of `POST /auth/login`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Successful credential exchange.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    /// Token expiry as an RFC 3339 UTC timestamp.
    pub expires_at_utc: String,
}

/// Body of `GET /auth/me`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ProfileResponse {
    pub id: i64,
    #[serde(rename = "nombre")]
    pub name: String,
    pub email: String,
    /// Raw role tags; validated by the `Profile` conversion.
    pub roles: Vec<String>,
}

impl TryFrom<ProfileResponse> for Profile {
    type Error = ProfileError;

    fn try_from(dto: ProfileResponse) -> Result<Self, Self::Error> {
        let roles = dto
            .roles
            .iter()
            .map(|tag| tag.parse::<Role>())
            .collect::<Result<Vec<_>, _>>()
            .inspect_err(|e| error!("auth: rejecting profile {}: {e}", dto.id))?;
        Profile::new(dto.id, dto.name, dto.email, roles)
    }
}
