// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module defines environment variable names, default values and the
//! [`AppConfig`] snapshot built once at startup. The snapshot is passed by
//! reference into the components that need it; nothing reads the
//! environment after `main` has built it.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `JWT_SECRET` | HMAC-SHA256 signing secret | Required |
//! | `PUBLIC_BASE_URL` | Base URL used in confirmation links | `http://localhost:8080` |
//! | `CONFIRMATION_TOKEN_TTL_SECS` | Confirmation token lifetime | `3600` |
//! | `DATABASE_URL` | MySQL DSN (stored procedures) | In-memory store |
//! | `SEED_ADMIN_EMAIL` | Pre-provisioned admin (in-memory store only) | None |
//! | `EMAIL_FROM` | SMTP sender / username | Log-only mailer |
//! | `EMAIL_PASSWORD` | SMTP password | Required with `EMAIL_FROM` |
//! | `SMTP_HOST` | SMTP server host | Required with `EMAIL_FROM` |
//! | `SMTP_PORT` | SMTP server port (implicit TLS) | `465` |
//! | `SMTP_INSECURE_SKIP_TLS_VERIFY` | Disable SMTP certificate checks | `false` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::env;

use chrono::Duration;
use secrecy::SecretString;
use thiserror::Error;
use url::Url;

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const JWT_SECRET_ENV: &str = "JWT_SECRET";
pub const PUBLIC_BASE_URL_ENV: &str = "PUBLIC_BASE_URL";
pub const CONFIRMATION_TTL_ENV: &str = "CONFIRMATION_TOKEN_TTL_SECS";
pub const DATABASE_URL_ENV: &str = "DATABASE_URL";
pub const SEED_ADMIN_EMAIL_ENV: &str = "SEED_ADMIN_EMAIL";
pub const EMAIL_FROM_ENV: &str = "EMAIL_FROM";
pub const EMAIL_PASSWORD_ENV: &str = "EMAIL_PASSWORD";
pub const SMTP_HOST_ENV: &str = "SMTP_HOST";
pub const SMTP_PORT_ENV: &str = "SMTP_PORT";

/// Disables certificate verification on the outbound SMTP connection.
///
/// Only meant for talking to a local relay with a self-signed certificate.
/// Never enable this against a real mail provider.
pub const SMTP_INSECURE_SKIP_TLS_VERIFY_ENV: &str = "SMTP_INSECURE_SKIP_TLS_VERIFY";

pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_PUBLIC_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_CONFIRMATION_TTL_SECS: i64 = 3600;
pub const DEFAULT_SMTP_PORT: u16 = 465;
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

/// Errors raised while reading the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// SMTP delivery settings.
#[derive(Debug)]
pub struct SmtpConfig {
    pub from: String,
    pub password: SecretString,
    pub host: String,
    pub port: u16,
    pub insecure_skip_tls_verify: bool,
}

/// Immutable process-wide configuration.
#[derive(Debug)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub jwt_secret: SecretString,
    pub public_base_url: Url,
    pub confirmation_ttl: Duration,
    pub database_url: Option<SecretString>,
    pub seed_admin_email: Option<String>,
    /// `None` selects the log-only mailer.
    pub smtp: Option<SmtpConfig>,
}

impl AppConfig {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let host = get(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = match get(PORT_ENV) {
            Some(raw) => parse_number(PORT_ENV, &raw)?,
            None => DEFAULT_PORT,
        };

        let jwt_secret = get(JWT_SECRET_ENV)
            .map(SecretString::from)
            .ok_or(ConfigError::Missing(JWT_SECRET_ENV))?;

        let raw_base = get(PUBLIC_BASE_URL_ENV).unwrap_or_else(|| DEFAULT_PUBLIC_BASE_URL.to_string());
        let public_base_url = Url::parse(&raw_base).map_err(|e| ConfigError::Invalid {
            name: PUBLIC_BASE_URL_ENV,
            reason: e.to_string(),
        })?;

        let ttl_secs: i64 = match get(CONFIRMATION_TTL_ENV) {
            Some(raw) => parse_number(CONFIRMATION_TTL_ENV, &raw)?,
            None => DEFAULT_CONFIRMATION_TTL_SECS,
        };
        if ttl_secs <= 0 {
            return Err(ConfigError::Invalid {
                name: CONFIRMATION_TTL_ENV,
                reason: "must be a positive number of seconds".to_string(),
            });
        }

        let smtp = match get(EMAIL_FROM_ENV) {
            Some(from) => Some(SmtpConfig {
                from,
                password: get(EMAIL_PASSWORD_ENV)
                    .map(SecretString::from)
                    .ok_or(ConfigError::Missing(EMAIL_PASSWORD_ENV))?,
                host: get(SMTP_HOST_ENV).ok_or(ConfigError::Missing(SMTP_HOST_ENV))?,
                port: match get(SMTP_PORT_ENV) {
                    Some(raw) => parse_number(SMTP_PORT_ENV, &raw)?,
                    None => DEFAULT_SMTP_PORT,
                },
                insecure_skip_tls_verify: match get(SMTP_INSECURE_SKIP_TLS_VERIFY_ENV) {
                    Some(raw) => parse_flag(SMTP_INSECURE_SKIP_TLS_VERIFY_ENV, &raw)?,
                    None => false,
                },
            }),
            None => None,
        };

        Ok(Self {
            host,
            port,
            jwt_secret,
            public_base_url,
            confirmation_ttl: Duration::seconds(ttl_secs),
            database_url: get(DATABASE_URL_ENV).map(SecretString::from),
            seed_admin_email: get(SEED_ADMIN_EMAIL_ENV),
            smtp,
        })
    }

    /// Socket address string the server binds to.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_number<T>(name: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        name,
        reason: e.to_string(),
    })
}

fn parse_flag(name: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::Invalid {
            name,
            reason: format!("expected a boolean, got '{other}'"),
        }),
    }
}
