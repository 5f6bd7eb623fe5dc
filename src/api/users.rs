// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User endpoints.

use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::auth::{Auth, AuthenticatedUser};

/// Response for GET /api/me
#[derive(Debug, Serialize, ToSchema)]
pub struct UserMeResponse {
    /// Account ID from the token
    pub user_id: String,
    /// Account email from the token
    pub email: String,
    /// Role claim, always `admin` behind the gate
    pub role: String,
    /// When the presented token stops being accepted
    pub expires_at: DateTime<Utc>,
}

impl From<AuthenticatedUser> for UserMeResponse {
    fn from(user: AuthenticatedUser) -> Self {
        Self {
            user_id: user.user_id,
            email: user.email,
            role: user.role.to_string(),
            expires_at: user.expires_at,
        }
    }
}

/// Get the identity of the calling administrator.
#[utoipa::path(
    get,
    path = "/api/me",
    tag = "Users",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "User information", body = UserMeResponse),
        (status = 401, description = "Missing or invalid token, or no role claim"),
        (status = 403, description = "Caller is not an admin"),
    )
)]
pub async fn get_current_user(Auth(user): Auth) -> Json<UserMeResponse> {
    Json(user.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Role;

    #[test]
    fn user_me_response_from_authenticated_user() {
        let expires_at = DateTime::from_timestamp(1_700_003_600, 0).unwrap();
        let user = AuthenticatedUser {
            user_id: "user_123".to_string(),
            email: "a@x.com".to_string(),
            role: Role::Admin,
            expires_at,
        };

        let response: UserMeResponse = user.into();
        assert_eq!(response.user_id, "user_123");
        assert_eq!(response.email, "a@x.com");
        assert_eq!(response.role, "admin");
        assert_eq!(response.expires_at, expires_at);
    }
}
