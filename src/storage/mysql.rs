// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! MySQL credential store backed by the department database's stored procedures.
//!
//! Procedures used:
//!
//! | Procedure | Arguments | Result |
//! |-----------|-----------|--------|
//! | `GetUserByEmail` | email | id, email, password, is_password_set, activated, role, department |
//! | `SetUserPassword` | email, hash | none |
//! | `ActivateUser` | email | none |
//! | `UpdateUserPasswordStatus` | email, flag | none |
//!
//! The update procedures match on email and succeed without effect when no
//! account has it.

use async_trait::async_trait;
use sqlx::{
    mysql::{MySqlPool, MySqlPoolOptions, MySqlRow},
    Row,
};

use super::{Account, CredentialStore, StorageError, StorageResult};
use crate::auth::Role;

const MAX_CONNECTIONS: u32 = 10;

pub struct MySqlCredentialStore {
    pool: MySqlPool,
}

impl MySqlCredentialStore {
    /// Open a connection pool. The pool connects lazily on first use.
    pub fn connect_lazy(database_url: &str) -> StorageResult<Self> {
        let pool = MySqlPoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .connect_lazy(database_url)?;
        Ok(Self { pool })
    }
}

fn account_from_row(row: &MySqlRow) -> StorageResult<Account> {
    let role: String = row.try_get(5)?;
    Ok(Account {
        id: row.try_get(0)?,
        email: row.try_get(1)?,
        password_hash: row.try_get(2)?,
        is_password_set: row.try_get(3)?,
        activated: row.try_get(4)?,
        role: Role::from(role),
        department_id: row.try_get(6)?,
    })
}

#[async_trait]
impl CredentialStore for MySqlCredentialStore {
    async fn get_by_email(&self, email: &str) -> StorageResult<Account> {
        let row = sqlx::query("CALL GetUserByEmail(?)")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StorageError::NotFound(format!("Account {email}")))?;

        account_from_row(&row)
    }

    async fn set_password_hash(&self, email: &str, password_hash: &str) -> StorageResult<()> {
        sqlx::query("CALL SetUserPassword(?, ?)")
            .bind(email)
            .bind(password_hash)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn set_activated(&self, email: &str, activated: bool) -> StorageResult<()> {
        // The schema only offers activation, there is no deactivation procedure.
        if !activated {
            return Err(StorageError::Unsupported("deactivating an account"));
        }

        sqlx::query("CALL ActivateUser(?)")
            .bind(email)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn set_password_set_flag(&self, email: &str, is_password_set: bool) -> StorageResult<()> {
        sqlx::query("CALL UpdateUserPasswordStatus(?, ?)")
            .bind(email)
            .bind(is_password_set)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
