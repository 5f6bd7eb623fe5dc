// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Confirmation email delivery.
//!
//! Registration hands the confirmation link to a [`ConfirmationSender`]:
//!
//! - [`SmtpMailer`] sends a plain-text message over implicit TLS with
//!   username/password authentication.
//! - [`LogMailer`] only logs the recipient, for local runs without SMTP.
//!
//! Sends are attempted once; there is no retry or outbox.
//!
//! ## Certificate verification
//!
//! `SmtpMailer` verifies the server certificate unless
//! `SMTP_INSECURE_SKIP_TLS_VERIFY` is set. With the flag on, the connection
//! is still encrypted but anyone on the network path can impersonate the
//! mail server and read the confirmation links.

use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::{
        authentication::Credentials,
        client::{Tls, TlsParameters},
    },
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use secrecy::ExposeSecret;
use thiserror::Error;
use tracing::{info, warn};
use url::Url;

use crate::config::SmtpConfig;

pub const CONFIRMATION_SUBJECT: &str = "Confirm your account";

#[derive(Debug, Error)]
pub enum MailError {
    #[error("invalid email address: {0}")]
    Address(#[from] lettre::address::AddressError),
    #[error("failed to build message: {0}")]
    Message(#[from] lettre::error::Error),
    #[error("SMTP delivery failed: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),
}

/// Body of the confirmation message.
pub fn confirmation_body(link: &Url) -> String {
    format!("Click the link to confirm your account: {link}")
}

/// Outbound delivery of confirmation links.
#[async_trait]
pub trait ConfirmationSender: Send + Sync {
    async fn send_confirmation_email(&self, email: &str, link: &Url) -> Result<(), MailError>;
}

/// Sender that logs instead of delivering.
#[derive(Debug, Clone, Default)]
pub struct LogMailer;

#[async_trait]
impl ConfirmationSender for LogMailer {
    async fn send_confirmation_email(&self, email: &str, _link: &Url) -> Result<(), MailError> {
        info!(to_email = %email, subject = CONFIRMATION_SUBJECT, "confirmation email not sent (no SMTP configured)");
        Ok(())
    }
}

/// SMTP sender over implicit TLS.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(config: &SmtpConfig) -> Result<Self, MailError> {
        if config.insecure_skip_tls_verify {
            warn!(
                smtp_host = %config.host,
                "SMTP certificate verification is DISABLED (SMTP_INSECURE_SKIP_TLS_VERIFY)"
            );
        }

        let tls = TlsParameters::builder(config.host.clone())
            .dangerous_accept_invalid_certs(config.insecure_skip_tls_verify)
            .build()?;

        let credentials = Credentials::new(
            config.from.clone(),
            config.password.expose_secret().to_string(),
        );

        let transport = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(config.host.as_str())
            .port(config.port)
            .tls(Tls::Wrapper(tls))
            .credentials(credentials)
            .build();

        Ok(Self {
            transport,
            from: config.from.parse()?,
        })
    }
}

#[async_trait]
impl ConfirmationSender for SmtpMailer {
    async fn send_confirmation_email(&self, email: &str, link: &Url) -> Result<(), MailError> {
        let message = Message::builder()
            .from(self.from.clone())
            .to(email.parse()?)
            .subject(CONFIRMATION_SUBJECT)
            .header(ContentType::TEXT_PLAIN)
            .body(confirmation_body(link))?;

        self.transport.send(message).await?;
        info!(to_email = %email, "confirmation email sent");
        Ok(())
    }
}
