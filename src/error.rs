// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::auth::AccountError;

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl From<AccountError> for ApiError {
    fn from(e: AccountError) -> Self {
        match e {
            AccountError::AccountNotFound => {
                Self::not_found("User not found. Please contact your company administrator.")
            }
            AccountError::AlreadyRegistered => {
                Self::conflict("User is already registered. Please go to the login page.")
            }
            AccountError::PolicyViolation(violation) => Self::bad_request(violation.to_string()),
            AccountError::InvalidOrExpiredToken => Self::bad_request("Invalid or expired token"),
            AccountError::InvalidCredentials => Self::unauthorized(
                "Invalid email or password. Please check your credentials and try again.",
            ),
            AccountError::AccountNotActivated => {
                Self::unauthorized("Password not set. Please register first!")
            }
            AccountError::Lookup(_) => Self::internal("Error looking up user. Please try again later."),
            AccountError::Hashing(_) => {
                Self::internal("Error hashing password. Please try again later.")
            }
            AccountError::PasswordPersist(_) => {
                Self::internal("Error setting password. Please try again later.")
            }
            AccountError::ConfirmationToken(_) => {
                Self::internal("Error generating confirmation token. Please try again later.")
            }
            AccountError::NotificationFailure(_) => {
                Self::internal("Error sending email. Please try again later.")
            }
            AccountError::Activation(_) => {
                Self::internal("Error activating user. Please try again later.")
            }
            AccountError::PasswordStatus(_) => {
                Self::internal("Error updating user status. Please try again later.")
            }
            AccountError::SessionToken(_) => {
                Self::internal("Error generating token. Please try again later.")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody {
            error: self.message,
        });
        (self.status, body).into_response()
    }
}
