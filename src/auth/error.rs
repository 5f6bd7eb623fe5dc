// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Rejections produced by the admin gate and the `Auth` extractor.
///
/// Token problems all map to [`AuthError::InvalidToken`];
/// callers never learn whether a token was expired, malformed or forged.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No authorization header present
    #[error("Authorization header missing")]
    MissingAuthHeader,
    /// Signature, structure or expiry check failed
    #[error("Invalid token")]
    InvalidToken,
    /// Token verified but carries no usable role
    #[error("Unauthorized. Role claim missing or invalid")]
    MissingRoleClaim,
    /// Authenticated, but not an administrator
    #[error("Forbidden. User is not an admin")]
    Forbidden,
    /// A handler asked for the caller identity on a route without the gate
    #[error("Internal authentication error: {0}")]
    Internal(String),
}

#[derive(Serialize)]
struct AuthErrorBody {
    error: String,
    error_code: String,
}

impl AuthError {
    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::MissingAuthHeader => "missing_auth_header",
            AuthError::InvalidToken => "invalid_token",
            AuthError::MissingRoleClaim => "missing_role_claim",
            AuthError::Forbidden => "forbidden",
            AuthError::Internal(_) => "internal_error",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MissingAuthHeader | AuthError::InvalidToken | AuthError::MissingRoleClaim => {
                StatusCode::UNAUTHORIZED
            }
            AuthError::Forbidden => StatusCode::FORBIDDEN,
            AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(AuthErrorBody {
            error: self.to_string(),
            error_code: self.error_code().to_string(),
        });
        (status, body).into_response()
    }
}
