// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Shared fixtures for unit and router tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Duration;
use url::Url;

use crate::auth::{AuthService, PasswordHasher, TokenService};
use crate::mailer::{ConfirmationSender, MailError};
use crate::state::AppState;
use crate::storage::{Account, CredentialStore, InMemoryStore, StorageError, StorageResult};

pub const TEST_SECRET: &[u8] = b"test-secret-for-unit-tests-only";

/// bcrypt's minimum cost, to keep tests fast.
pub const FAST_HASH_COST: u32 = 4;

pub fn test_tokens() -> TokenService {
    TokenService::from_secret(TEST_SECRET)
}

/// Mailer that records every link instead of sending it.
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<(String, Url)>>,
    fail: bool,
}

impl RecordingMailer {
    /// A mailer whose every send fails with an address error.
    pub fn failing() -> Self {
        Self {
            sent: Mutex::default(),
            fail: true,
        }
    }

    pub fn sent(&self) -> Vec<(String, Url)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl ConfirmationSender for RecordingMailer {
    async fn send_confirmation_email(&self, email: &str, link: &Url) -> Result<(), MailError> {
        if self.fail {
            let err = "not an address".parse::<lettre::Address>().unwrap_err();
            return Err(MailError::Address(err));
        }
        self.sent
            .lock()
            .unwrap()
            .push((email.to_string(), link.clone()));
        Ok(())
    }
}

/// In-memory store that fails the password-set flag update.
pub struct FailingStore {
    pub inner: InMemoryStore,
    fail_password_flag: bool,
}

impl FailingStore {
    pub fn failing_password_flag() -> Self {
        Self {
            inner: InMemoryStore::new(),
            fail_password_flag: true,
        }
    }
}

#[async_trait]
impl CredentialStore for FailingStore {
    async fn get_by_email(&self, email: &str) -> StorageResult<Account> {
        self.inner.get_by_email(email).await
    }

    async fn set_password_hash(&self, email: &str, password_hash: &str) -> StorageResult<()> {
        self.inner.set_password_hash(email, password_hash).await
    }

    async fn set_activated(&self, email: &str, activated: bool) -> StorageResult<()> {
        self.inner.set_activated(email, activated).await
    }

    async fn set_password_set_flag(&self, email: &str, is_password_set: bool) -> StorageResult<()> {
        if self.fail_password_flag {
            return Err(StorageError::Unsupported("password status update"));
        }
        self.inner.set_password_set_flag(email, is_password_set).await
    }
}

/// App state over an in-memory store and a recording mailer.
pub struct TestApp {
    pub state: AppState,
    pub store: Arc<InMemoryStore>,
    pub mailer: Arc<RecordingMailer>,
}

pub fn test_app() -> TestApp {
    let store = Arc::new(InMemoryStore::new());
    let mailer = Arc::new(RecordingMailer::default());
    let tokens = Arc::new(test_tokens());
    let base = Url::parse("http://localhost:8080").unwrap();
    let auth = AuthService::new(
        store.clone(),
        tokens.clone(),
        PasswordHasher::with_cost(FAST_HASH_COST),
        mailer.clone(),
        &base,
        Duration::minutes(30),
    );

    TestApp {
        state: AppState::new(Arc::new(auth), tokens),
        store,
        mailer,
    }
}
