// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-memory credential store for local runs and tests.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{Account, CredentialStore, StorageError, StorageResult};

/// A write applied to the store, in the order it happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreWrite {
    PasswordHash { email: String },
    Activated { email: String, value: bool },
    PasswordSetFlag { email: String, value: bool },
}

#[derive(Default)]
struct Inner {
    accounts: HashMap<String, Account>,
    writes: Vec<StoreWrite>,
}

/// Accounts keyed by email, guarded by a single lock.
#[derive(Default)]
pub struct InMemoryStore {
    inner: RwLock<Inner>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Provision an account, replacing any account with the same email.
    ///
    /// This is the administrator step that happens before registration.
    pub async fn insert(&self, account: Account) {
        let mut inner = self.inner.write().await;
        inner.accounts.insert(account.email.clone(), account);
    }

    /// Every write applied since creation, oldest first.
    pub async fn writes(&self) -> Vec<StoreWrite> {
        self.inner.read().await.writes.clone()
    }

    // Unknown emails are a silent no-op, like an UPDATE matching no rows.
    async fn update<F>(&self, email: &str, write: StoreWrite, apply: F) -> StorageResult<()>
    where
        F: FnOnce(&mut Account),
    {
        let mut inner = self.inner.write().await;
        let Some(account) = inner.accounts.get_mut(email) else {
            return Ok(());
        };
        apply(account);
        inner.writes.push(write);
        Ok(())
    }
}

#[async_trait]
impl CredentialStore for InMemoryStore {
    async fn get_by_email(&self, email: &str) -> StorageResult<Account> {
        self.inner
            .read()
            .await
            .accounts
            .get(email)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(format!("Account {email}")))
    }

    async fn set_password_hash(&self, email: &str, password_hash: &str) -> StorageResult<()> {
        let write = StoreWrite::PasswordHash {
            email: email.to_string(),
        };
        self.update(email, write, |account| {
            account.password_hash = Some(password_hash.to_string());
        })
        .await
    }

    async fn set_activated(&self, email: &str, activated: bool) -> StorageResult<()> {
        let write = StoreWrite::Activated {
            email: email.to_string(),
            value: activated,
        };
        self.update(email, write, |account| account.activated = activated)
            .await
    }

    async fn set_password_set_flag(&self, email: &str, is_password_set: bool) -> StorageResult<()> {
        let write = StoreWrite::PasswordSetFlag {
            email: email.to_string(),
            value: is_password_set,
        };
        self.update(email, write, |account| account.is_password_set = is_password_set)
            .await
    }
}
