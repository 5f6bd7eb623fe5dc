// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Credential Storage
//!
//! Accounts live in an external relational database managed by the
//! user-administration side; this service only reads and updates the
//! authentication fields of an account through [`CredentialStore`].
//!
//! ## Backends
//!
//! - [`MySqlCredentialStore`] calls the stored procedures of the department
//!   database (`GetUserByEmail`, `SetUserPassword`, `ActivateUser`,
//!   `UpdateUserPasswordStatus`).
//! - [`InMemoryStore`] keeps accounts in process memory for local runs and
//!   tests. It also records every write in order.
//!
//! Each call is a single statement. Nothing here groups writes into a
//! transaction.

pub mod accounts;
pub mod memory;
pub mod mysql;

pub use accounts::{Account, AccountState, CredentialStore};
pub use memory::{InMemoryStore, StoreWrite};
pub use mysql::MySqlCredentialStore;

use thiserror::Error;

/// Error type for credential store operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// No account matches the lookup
    #[error("Not found: {0}")]
    NotFound(String),
    /// Database driver or connection failure
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    /// The backend cannot perform this write
    #[error("Unsupported operation: {0}")]
    Unsupported(&'static str),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;
