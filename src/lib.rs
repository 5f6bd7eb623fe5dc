// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Department Admin Server - Authentication Backend
//!
//! Onboarding and access control for the department administration API:
//! invite-based registration, email confirmation, password login and an
//! admin-only gate in front of every `/api` route.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers and router (Axum)
//! - `auth` - Password policy, tokens, account lifecycle and the admin gate
//! - `config` - Environment configuration
//! - `mailer` - Confirmation email delivery (SMTP or log-only)
//! - `storage` - Credential store (MySQL stored procedures or in-memory)

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod mailer;
pub mod models;
pub mod state;
pub mod storage;
pub mod telemetry;

#[cfg(test)]
pub(crate) mod test_support;
