// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Password policy and bcrypt hashing.

use thiserror::Error;

/// Minimum number of characters.
pub const MIN_PASSWORD_LENGTH: usize = 5;

/// Minimum number of ASCII decimal digits.
pub const MIN_PASSWORD_DIGITS: usize = 3;

/// bcrypt work factor used for stored hashes.
pub const PASSWORD_HASH_COST: u32 = 10;

/// First password rule a candidate breaks.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum PolicyViolation {
    #[error("password must be at least 5 characters long")]
    TooShort,
    #[error("password must contain at least 3 digits")]
    TooFewDigits,
}

#[derive(Debug, Error)]
#[error("failed to hash password: {0}")]
pub struct HashError(#[from] bcrypt::BcryptError);

/// Check a candidate password. The length rule is reported before the digit rule.
pub fn validate_password(candidate: &str) -> Result<(), PolicyViolation> {
    if candidate.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(PolicyViolation::TooShort);
    }

    let digits = candidate.chars().filter(|c| c.is_ascii_digit()).count();
    if digits < MIN_PASSWORD_DIGITS {
        return Err(PolicyViolation::TooFewDigits);
    }

    Ok(())
}

/// Salted adaptive password hasher.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    pub fn new() -> Self {
        Self::with_cost(PASSWORD_HASH_COST)
    }

    /// Hasher with a custom bcrypt cost (4..=31).
    pub fn with_cost(cost: u32) -> Self {
        Self { cost }
    }

    /// Hash a plaintext password. Each call uses a fresh random salt.
    ///
    /// Passwords over bcrypt's 72-byte input limit are refused rather than
    /// truncated.
    pub fn hash(&self, plaintext: &str) -> Result<String, HashError> {
        Ok(bcrypt::non_truncating_hash(plaintext, self.cost)?)
    }

    /// Compare a candidate against a stored hash.
    ///
    /// A stored value that is not a bcrypt hash, or a candidate over the
    /// 72-byte limit, counts as a mismatch.
    pub fn verify(&self, stored_hash: &str, candidate: &str) -> bool {
        bcrypt::non_truncating_verify(candidate, stored_hash).unwrap_or(false)
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}
