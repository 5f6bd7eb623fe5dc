// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use secrecy::ExposeSecret;
use thiserror::Error;
use tracing::{info, warn};

use crate::auth::{AuthService, PasswordHasher, Role, TokenService};
use crate::config::AppConfig;
use crate::mailer::{ConfirmationSender, LogMailer, MailError, SmtpMailer};
use crate::storage::{Account, CredentialStore, InMemoryStore, MySqlCredentialStore, StorageError};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("credential store: {0}")]
    Storage(#[from] StorageError),
    #[error("mailer: {0}")]
    Mail(#[from] MailError),
}

/// Shared handles for all handlers. Built once at startup, read-only afterwards.
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService>,
    pub tokens: Arc<TokenService>,
}

impl AppState {
    pub fn new(auth: Arc<AuthService>, tokens: Arc<TokenService>) -> Self {
        Self { auth, tokens }
    }

    /// Pick the store and mailer backends from configuration.
    ///
    /// Without `DATABASE_URL` accounts live in memory, optionally seeded with
    /// one admin invite. Without SMTP settings confirmation links are only logged.
    pub async fn from_config(config: &AppConfig) -> Result<Self, StartupError> {
        let store: Arc<dyn CredentialStore> = match &config.database_url {
            Some(url) => {
                info!("using MySQL credential store");
                Arc::new(MySqlCredentialStore::connect_lazy(url.expose_secret())?)
            }
            None => {
                warn!("DATABASE_URL not set, accounts are kept in memory");
                let store = InMemoryStore::new();
                if let Some(email) = &config.seed_admin_email {
                    let id = uuid::Uuid::new_v4().to_string();
                    info!(email = %email, user_id = %id, "seeding admin invite");
                    store.insert(Account::invited(id, email, Role::Admin)).await;
                }
                Arc::new(store)
            }
        };

        let mailer: Arc<dyn ConfirmationSender> = match &config.smtp {
            Some(smtp) => {
                info!(smtp_host = %smtp.host, smtp_port = smtp.port, "using SMTP mailer");
                Arc::new(SmtpMailer::new(smtp)?)
            }
            None => {
                warn!("SMTP not configured, confirmation links are only logged");
                Arc::new(LogMailer)
            }
        };

        let tokens = Arc::new(TokenService::new(&config.jwt_secret));
        let auth = AuthService::new(
            store,
            tokens.clone(),
            PasswordHasher::new(),
            mailer,
            &config.public_base_url,
            config.confirmation_ttl,
        );

        Ok(Self::new(Arc::new(auth), tokens))
    }
}
