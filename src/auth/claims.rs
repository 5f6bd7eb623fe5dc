// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JWT claims and authenticated user representation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::roles::Role;

/// Claims as they travel inside a signed token.
///
/// Session and confirmation tokens share this shape. Identity fields default
/// to empty strings when absent; the role is kept as a raw JSON value so
/// the gate can tell a missing or non-string role apart from a wrong one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct JwtClaims {
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<serde_json::Value>,
    /// Expiration timestamp (seconds since the Unix epoch)
    pub exp: i64,
}

/// Claims of a token that passed signature and expiry checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Claims {
    pub user_id: String,
    pub email: String,
    /// `None` when the token has no role or the role is not a string
    pub role: Option<Role>,
    pub expires_at: DateTime<Utc>,
}

impl From<JwtClaims> for Claims {
    fn from(raw: JwtClaims) -> Self {
        let role = raw
            .role
            .as_ref()
            .and_then(|value| value.as_str())
            .map(Role::from);

        Self {
            user_id: raw.user_id,
            email: raw.email,
            role,
            expires_at: DateTime::from_timestamp(raw.exp, 0).unwrap_or(DateTime::UNIX_EPOCH),
        }
    }
}

/// Identity attached to a request by the admin gate.
///
/// Downstream handlers read it through the `Auth` extractor instead of
/// decoding the token a second time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthenticatedUser {
    pub user_id: String,
    pub email: String,
    pub role: Role,
    /// Token expiration, not serialized
    #[serde(skip)]
    pub expires_at: DateTime<Utc>,
}

impl AuthenticatedUser {
    /// Build from verified claims. Returns `None` when the role is unusable.
    pub fn from_claims(claims: Claims) -> Option<Self> {
        let role = claims.role?;
        Some(Self {
            user_id: claims.user_id,
            email: claims.email,
            role,
            expires_at: claims.expires_at,
        })
    }

    /// Check if this user is an admin.
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}
