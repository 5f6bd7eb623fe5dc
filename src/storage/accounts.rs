// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Account records and the credential store interface.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::StorageResult;
use crate::auth::Role;

/// A provisioned employee account, as far as authentication is concerned.
///
/// Accounts are created by an administrator with `activated = false`,
/// `is_password_set = false` and no password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Opaque account identifier
    pub id: String,
    /// Unique, compared case-sensitively
    pub email: String,
    /// bcrypt hash, absent until the first registration attempt
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_hash: Option<String>,
    pub is_password_set: bool,
    /// Only activated accounts may log in
    pub activated: bool,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department_id: Option<String>,
}

impl Account {
    /// A freshly provisioned account that has not registered yet.
    pub fn invited(id: impl Into<String>, email: impl Into<String>, role: Role) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            password_hash: None,
            is_password_set: false,
            activated: false,
            role,
            department_id: None,
        }
    }

    /// Password stored and confirmed: further registration attempts are refused.
    pub fn is_fully_registered(&self) -> bool {
        self.is_password_set && self.activated
    }
}

/// Onboarding state of an account, derived from its flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountState {
    /// Provisioned, no password submitted yet
    Invited,
    /// Password submitted, confirmation link not followed yet
    PasswordPendingConfirmation,
    /// Email confirmed; the account can log in
    Activated,
}

impl AccountState {
    pub fn of(account: &Account) -> Self {
        if account.activated {
            AccountState::Activated
        } else if account.is_password_set || account.password_hash.is_some() {
            AccountState::PasswordPendingConfirmation
        } else {
            AccountState::Invited
        }
    }
}

/// Access to the authentication fields of accounts.
///
/// Every method is a single write or read against the backing store.
/// Only lookups report a missing account: a write addressed to an email
/// with no account changes nothing and returns `Ok`, the way the
/// department database's update procedures behave.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Look up an account by exact email. `StorageError::NotFound` if absent.
    async fn get_by_email(&self, email: &str) -> StorageResult<Account>;

    /// Store a new password hash for the account.
    async fn set_password_hash(&self, email: &str, password_hash: &str) -> StorageResult<()>;

    /// Set the activation flag.
    async fn set_activated(&self, email: &str, activated: bool) -> StorageResult<()>;

    /// Set the password-set flag.
    async fn set_password_set_flag(&self, email: &str, is_password_set: bool) -> StorageResult<()>;
}
