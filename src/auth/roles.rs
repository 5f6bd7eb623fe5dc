// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User roles for authorization.

use serde::{Deserialize, Serialize};

/// Role name as stored on the account and carried in tokens.
///
/// Roles are an open set managed by the user-administration side. Only
/// `admin` carries privileges in this service; every other name is kept
/// verbatim so it round-trips through tokens unchanged.
///
/// Matching is exact and case-sensitive: `"Admin"` is not an admin.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    /// Full administrative access to `/api`
    Admin,
    /// Any other role name
    Other(String),
}

impl Role {
    pub const ADMIN: &'static str = "admin";

    /// Check if this role may use the administration API.
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Role::Admin => Self::ADMIN,
            Role::Other(name) => name,
        }
    }
}

impl From<String> for Role {
    fn from(value: String) -> Self {
        if value == Self::ADMIN {
            Role::Admin
        } else {
            Role::Other(value)
        }
    }
}

impl From<&str> for Role {
    fn from(value: &str) -> Self {
        Role::from(value.to_string())
    }
}

impl From<Role> for String {
    fn from(value: Role) -> Self {
        match value {
            Role::Admin => Role::ADMIN.to_string(),
            Role::Other(name) => name,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
