// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! HS256 bearer token issuance and verification.
//!
//! Session tokens and confirmation tokens are the same kind of token: the
//! caller picks the lifetime and the transport (Authorization header or a
//! `?token=` query parameter). There is no revocation list, so a token stays
//! valid until it expires regardless of later account changes.

use base64ct::{Base64UrlUnpadded, Encoding};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use sha2::{Digest, Sha256};
use thiserror::Error;

use super::claims::{Claims, JwtClaims};
use super::roles::Role;

/// Session token lifetime (24 hours).
pub const SESSION_TOKEN_TTL_SECS: i64 = 24 * 60 * 60;

/// Expiry is checked to the second; no clock skew allowance.
const CLOCK_SKEW_LEEWAY: u64 = 0;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("failed to sign token: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),

    /// Bad signature, malformed token or expired: callers are not told which.
    #[error("token is invalid or expired")]
    Invalid,
}

/// Signs and verifies tokens with the process-wide HMAC secret.
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenService {
    pub fn new(secret: &SecretString) -> Self {
        Self::from_secret(secret.expose_secret().as_bytes())
    }

    pub fn from_secret(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = CLOCK_SKEW_LEEWAY;
        validation.validate_exp = true;
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Issue a token expiring `ttl` from now.
    pub fn issue(
        &self,
        user_id: &str,
        email: &str,
        role: &Role,
        ttl: Duration,
    ) -> Result<String, TokenError> {
        let claims = JwtClaims {
            user_id: user_id.to_string(),
            email: email.to_string(),
            role: Some(serde_json::Value::String(role.to_string())),
            exp: (Utc::now() + ttl).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding).map_err(TokenError::Signing)
    }

    /// Issue a 24 hour session token.
    pub fn issue_session(&self, user_id: &str, email: &str, role: &Role) -> Result<String, TokenError> {
        self.issue(user_id, email, role, Duration::seconds(SESSION_TOKEN_TTL_SECS))
    }

    /// Verify signature and expiry and return the decoded claims.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let data = decode::<JwtClaims>(token, &self.decoding, &self.validation).map_err(|e| {
            tracing::debug!(reason = ?e.kind(), "token rejected");
            TokenError::Invalid
        })?;

        Ok(Claims::from(data.claims))
    }
}

/// Short, log-safe identifier for a token.
///
/// Tokens are bearer credentials and never go into logs; the first bytes of
/// their SHA-256 digest are enough to correlate log lines.
pub fn fingerprint(token: &str) -> String {
    let digest = Sha256::digest(token.as_bytes());
    Base64UrlUnpadded::encode_string(&digest[..9])
}
