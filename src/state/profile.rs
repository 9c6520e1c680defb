//! User identity and role model.
//!
//! DESIGN
//! ======
//! Roles are a closed enum. Anything the backend sends outside that set is a
//! contract violation and is rejected here instead of being mapped to a
//! default permission level.

#[cfg(test)]
#[path = "profile_test.rs"]
mod profile_test;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error produced when a profile cannot be built from collaborator data.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProfileError {
    /// A role tag outside `{Admin, Employee}` was received.
    #[error("unknown role: {0}")]
    UnknownRole(String),
    /// The profile carried no roles at all.
    #[error("profile has no roles")]
    NoRoles,
}

/// Access level tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Admin,
    Employee,
}

impl Role {
    /// Wire name of the role.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "Admin",
            Self::Employee => "Employee",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ProfileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Admin" => Ok(Self::Admin),
            "Employee" => Ok(Self::Employee),
            other => Err(ProfileError::UnknownRole(other.to_owned())),
        }
    }
}

/// Identity attributes plus the role set of the signed-in user.
///
/// `roles` is never empty and holds no duplicates. Its first entry is the
/// primary role.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ProfileRecord")]
pub struct Profile {
    pub id: i64,
    pub name: String,
    pub email: String,
    roles: Vec<Role>,
}

/// Unvalidated shape of a persisted profile.
#[derive(Deserialize)]
struct ProfileRecord {
    id: i64,
    name: String,
    email: String,
    roles: Vec<Role>,
}

impl TryFrom<ProfileRecord> for Profile {
    type Error = ProfileError;

    fn try_from(record: ProfileRecord) -> Result<Self, Self::Error> {
        Self::new(record.id, record.name, record.email, record.roles)
    }
}

impl Profile {
    /// Build a profile, dropping duplicate roles while keeping first-seen order.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::NoRoles`] when `roles` is empty.
    pub fn new(
        id: i64,
        name: impl Into<String>,
        email: impl Into<String>,
        roles: impl IntoIterator<Item = Role>,
    ) -> Result<Self, ProfileError> {
        let mut unique = Vec::new();
        for role in roles {
            if !unique.contains(&role) {
                unique.push(role);
            }
        }
        if unique.is_empty() {
            return Err(ProfileError::NoRoles);
        }
        Ok(Self { id, name: name.into(), email: email.into(), roles: unique })
    }

    #[must_use]
    pub fn roles(&self) -> &[Role] {
        &self.roles
    }

    #[must_use]
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    /// Whether any of `allowed` is held by this profile.
    #[must_use]
    pub fn has_any_role(&self, allowed: &[Role]) -> bool {
        allowed.iter().any(|role| self.has_role(*role))
    }

    #[must_use]
    pub fn primary_role(&self) -> Option<Role> {
        self.roles.first().copied()
    }
}
