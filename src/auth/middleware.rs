// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Admin gate for the `/api` router.
//!
//! ```rust,ignore
//! let api = Router::new()
//!     .route("/me", get(users::get_current_user))
//!     .layer(axum::middleware::from_fn_with_state(state.clone(), require_admin));
//! ```
//!
//! Checks, in order:
//!
//! 1. `Authorization` header present, else `MissingAuthHeader` (401)
//! 2. optional `Bearer ` prefix stripped (exact, case-sensitive)
//! 3. signature and expiry, else `InvalidToken` (401)
//! 4. string `role` claim, else `MissingRoleClaim` (401)
//! 5. role is `admin`, else `Forbidden` (403)
//!
//! On success the verified [`AuthenticatedUser`] is stored in the request
//! extensions for the handlers behind the gate.

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::warn;

use super::tokens::{fingerprint, TokenService};
use super::{AuthError, AuthenticatedUser};
use crate::state::AppState;

/// Run the admin checks against request headers.
pub fn authorize_admin(headers: &HeaderMap, tokens: &TokenService) -> Result<AuthenticatedUser, AuthError> {
    let header = match headers.get(AUTHORIZATION) {
        Some(value) if !value.is_empty() => value,
        _ => {
            warn!("authorization header missing");
            return Err(AuthError::MissingAuthHeader);
        }
    };

    let header = header.to_str().map_err(|_| {
        warn!("authorization header is not valid text");
        AuthError::InvalidToken
    })?;
    let token = header.strip_prefix("Bearer ").unwrap_or(header);

    let claims = tokens.verify(token).map_err(|e| {
        warn!(token = %fingerprint(token), error = %e, "invalid token");
        AuthError::InvalidToken
    })?;
    let email = claims.email.clone();

    let user = AuthenticatedUser::from_claims(claims).ok_or_else(|| {
        warn!(email = %email, "role claim missing or invalid");
        AuthError::MissingRoleClaim
    })?;

    if !user.is_admin() {
        warn!(email = %user.email, role = %user.role, "user is not an admin");
        return Err(AuthError::Forbidden);
    }

    Ok(user)
}

/// Middleware rejecting every request that does not carry an admin token.
pub async fn require_admin(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    match authorize_admin(request.headers(), &state.tokens) {
        Ok(user) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Err(e) => e.into_response(),
    }
}
