// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Registration, email confirmation and login.
//!
//! ## Account lifecycle
//!
//! ```text
//! Invited ──register──▶ PasswordPendingConfirmation ──confirm──▶ Activated
//!                         │            ▲
//!                         └─register───┘   (password may be replaced until confirmed)
//! ```
//!
//! Accounts are never created here; an administrator provisions them first.
//! Failures are returned at the step where they happen. Nothing is rolled
//! back: a stored password hash stays in place when the confirmation email
//! cannot be sent, and `confirm` writes the activation flag and the
//! password-set flag as two separate store calls.

use std::sync::Arc;

use chrono::Duration;
use thiserror::Error;
use tracing::{error, info, warn};
use url::Url;

use super::password::{validate_password, PasswordHasher, PolicyViolation};
use super::tokens::{fingerprint, TokenError, TokenService};
use crate::mailer::{ConfirmationSender, MailError};
use crate::storage::{AccountState, CredentialStore, StorageError};

/// Why a registration, confirmation or login was refused.
#[derive(Debug, Error)]
pub enum AccountError {
    #[error("account not found")]
    AccountNotFound,
    #[error("account is already registered")]
    AlreadyRegistered,
    #[error(transparent)]
    PolicyViolation(#[from] PolicyViolation),
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("account is not activated")]
    AccountNotActivated,
    #[error("confirmation token is invalid or expired")]
    InvalidOrExpiredToken,

    #[error("account lookup failed: {0}")]
    Lookup(#[source] StorageError),
    #[error("password hashing failed: {0}")]
    Hashing(String),
    #[error("storing password hash failed: {0}")]
    PasswordPersist(#[source] StorageError),
    #[error("issuing confirmation token failed: {0}")]
    ConfirmationToken(#[source] TokenError),
    #[error("sending confirmation email failed: {0}")]
    NotificationFailure(#[source] MailError),
    #[error("activating account failed: {0}")]
    Activation(#[source] StorageError),
    #[error("updating password status failed: {0}")]
    PasswordStatus(#[source] StorageError),
    #[error("issuing session token failed: {0}")]
    SessionToken(#[source] TokenError),
}

/// Drives accounts through registration, confirmation and login.
pub struct AuthService {
    store: Arc<dyn CredentialStore>,
    tokens: Arc<TokenService>,
    hasher: PasswordHasher,
    mailer: Arc<dyn ConfirmationSender>,
    confirm_url: Url,
    confirmation_ttl: Duration,
}

impl AuthService {
    /// `public_base_url` is where this server is reachable from the mail
    /// recipient's browser; the confirmation link points at its `/confirm`.
    pub fn new(
        store: Arc<dyn CredentialStore>,
        tokens: Arc<TokenService>,
        hasher: PasswordHasher,
        mailer: Arc<dyn ConfirmationSender>,
        public_base_url: &Url,
        confirmation_ttl: Duration,
    ) -> Self {
        let mut confirm_url = public_base_url.clone();
        confirm_url.set_query(None);
        confirm_url.set_fragment(None);
        if let Ok(mut segments) = confirm_url.path_segments_mut() {
            segments.pop_if_empty().push("confirm");
        }

        Self {
            store,
            tokens,
            hasher,
            mailer,
            confirm_url,
            confirmation_ttl,
        }
    }

    /// Link embedded in the confirmation email.
    pub fn confirmation_link(&self, token: &str) -> Url {
        let mut link = self.confirm_url.clone();
        link.query_pairs_mut().append_pair("token", token);
        link
    }

    /// Set the password of a provisioned account and mail a confirmation link.
    pub async fn register(&self, email: &str, password: &str) -> Result<(), AccountError> {
        info!(email = %email, "register attempt");

        let account = match self.store.get_by_email(email).await {
            Ok(account) => account,
            Err(StorageError::NotFound(_)) => {
                warn!(email = %email, "register rejected: account not provisioned");
                return Err(AccountError::AccountNotFound);
            }
            Err(e) => {
                error!(email = %email, error = %e, "register failed: account lookup");
                return Err(AccountError::Lookup(e));
            }
        };

        if account.is_fully_registered() {
            warn!(email = %email, "register rejected: already registered");
            return Err(AccountError::AlreadyRegistered);
        }

        if let Err(violation) = validate_password(password) {
            warn!(email = %email, rule = %violation, "register rejected: weak password");
            return Err(violation.into());
        }

        let hasher = self.hasher;
        let plaintext = password.to_string();
        let password_hash = tokio::task::spawn_blocking(move || hasher.hash(&plaintext))
            .await
            .map_err(|e| e.to_string())
            .and_then(|hashed| hashed.map_err(|e| e.to_string()))
            .map_err(|e| {
                error!(email = %email, error = %e, "register failed: hashing");
                AccountError::Hashing(e)
            })?;

        self.store
            .set_password_hash(email, &password_hash)
            .await
            .map_err(|e| {
                error!(email = %email, error = %e, "register failed: storing password");
                AccountError::PasswordPersist(e)
            })?;

        let token = self
            .tokens
            .issue(&account.id, &account.email, &account.role, self.confirmation_ttl)
            .map_err(|e| {
                error!(email = %email, error = %e, "register failed: confirmation token");
                AccountError::ConfirmationToken(e)
            })?;

        let link = self.confirmation_link(&token);
        self.mailer
            .send_confirmation_email(&account.email, &link)
            .await
            .map_err(|e| {
                error!(email = %email, error = %e, "register failed: sending confirmation email");
                AccountError::NotificationFailure(e)
            })?;

        info!(
            email = %email,
            token = %fingerprint(&token),
            state = ?AccountState::PasswordPendingConfirmation,
            "registration successful, confirmation email sent"
        );
        Ok(())
    }

    /// Activate the account named by a confirmation token.
    ///
    /// Returns the confirmed email.
    pub async fn confirm(&self, token: &str) -> Result<String, AccountError> {
        let claims = self.tokens.verify(token).map_err(|_| {
            warn!(token = %fingerprint(token), "confirm rejected: invalid or expired token");
            AccountError::InvalidOrExpiredToken
        })?;
        let email = claims.email;

        self.store.set_activated(&email, true).await.map_err(|e| {
            error!(email = %email, error = %e, "confirm failed: activation");
            AccountError::Activation(e)
        })?;
        info!(email = %email, "account activated");

        // Second, independent write. A failure here leaves the account
        // activated with the password-set flag still false.
        self.store
            .set_password_set_flag(&email, true)
            .await
            .map_err(|e| {
                error!(email = %email, error = %e, "confirm failed: password status");
                AccountError::PasswordStatus(e)
            })?;

        info!(email = %email, user_id = %claims.user_id, "account confirmed");
        Ok(email)
    }

    /// Check credentials and issue a 24 hour session token.
    pub async fn login(&self, email: &str, password: &str) -> Result<String, AccountError> {
        info!(email = %email, "login attempt");

        let account = match self.store.get_by_email(email).await {
            Ok(account) => account,
            Err(StorageError::NotFound(_)) => {
                warn!(email = %email, "login rejected: unknown email");
                return Err(AccountError::InvalidCredentials);
            }
            Err(e) => {
                error!(email = %email, error = %e, "login failed: account lookup");
                return Err(AccountError::Lookup(e));
            }
        };

        if !account.activated {
            warn!(email = %email, state = ?AccountState::of(&account), "login rejected: account not activated");
            return Err(AccountError::AccountNotActivated);
        }

        let hasher = self.hasher;
        let stored = account.password_hash.clone().unwrap_or_default();
        let candidate = password.to_string();
        let matches = tokio::task::spawn_blocking(move || hasher.verify(&stored, &candidate))
            .await
            .unwrap_or(false);

        if !matches {
            warn!(email = %email, "login rejected: wrong password");
            return Err(AccountError::InvalidCredentials);
        }

        let token = self
            .tokens
            .issue_session(&account.id, &account.email, &account.role)
            .map_err(|e| {
                error!(email = %email, error = %e, "login failed: session token");
                AccountError::SessionToken(e)
            })?;

        info!(email = %email, token = %fingerprint(&token), "login successful");
        Ok(token)
    }
}
