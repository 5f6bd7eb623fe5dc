// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Credential lifecycle and the admin gate for the department administration API.
//!
//! ## Onboarding Flow
//!
//! 1. An administrator provisions the account (outside this service)
//! 2. `POST /register` validates and stores the password, then mails a
//!    confirmation link carrying a short-lived token
//! 3. `GET /confirm?token=...` activates the account
//! 4. `POST /login` returns a 24 hour bearer token
//!
//! ## Admin Gate
//!
//! Every `/api` request must carry `Authorization: Bearer <token>` for an
//! account whose role is exactly `admin`. The gate attaches the verified
//! identity to the request; handlers read it with [`Auth`].
//!
//! ## Security
//!
//! - Passwords are stored as bcrypt hashes (cost 10)
//! - Tokens are HS256 JWTs signed with `JWT_SECRET`, no clock skew leeway
//! - Unknown email and wrong password produce the same login error
//! - Raw tokens are never logged, only their fingerprint

pub mod claims;
pub mod error;
pub mod extractor;
pub mod middleware;
pub mod password;
pub mod roles;
pub mod service;
pub mod tokens;

pub use claims::{AuthenticatedUser, Claims};
pub use error::AuthError;
pub use extractor::Auth;
pub use middleware::{authorize_admin, require_admin};
pub use password::{validate_password, PasswordHasher, PolicyViolation};
pub use roles::Role;
pub use service::{AccountError, AuthService};
pub use tokens::{TokenError, TokenService};
