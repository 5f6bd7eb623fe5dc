// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Public onboarding endpoints: register, confirm and login.

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    Json,
};
use tracing::warn;

use crate::{
    error::ApiError,
    models::{ConfirmQuery, CredentialsRequest, LoginResponse},
    state::AppState,
};

fn credentials(
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<CredentialsRequest, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        warn!(error = %rejection.body_text(), "rejected malformed request body");
        ApiError::bad_request("Invalid request body")
    })?;
    request.validate()?;
    Ok(request)
}

#[utoipa::path(
    post,
    path = "/register",
    request_body = CredentialsRequest,
    tag = "Auth",
    responses(
        (status = 201, description = "Password stored, confirmation email sent"),
        (status = 400, description = "Invalid body or password policy violation"),
        (status = 404, description = "Account not provisioned"),
        (status = 409, description = "Account already registered"),
        (status = 500, description = "Dependency failure")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let request = credentials(payload)?;
    state.auth.register(&request.email, &request.password).await?;
    Ok(StatusCode::CREATED)
}

#[utoipa::path(
    get,
    path = "/confirm",
    params(ConfirmQuery),
    tag = "Auth",
    responses(
        (status = 200, description = "Account activated"),
        (status = 400, description = "Missing, invalid or expired token"),
        (status = 500, description = "Dependency failure")
    )
)]
pub async fn confirm(
    State(state): State<AppState>,
    Query(query): Query<ConfirmQuery>,
) -> Result<StatusCode, ApiError> {
    let token = match query.token.as_deref() {
        Some(token) if !token.is_empty() => token,
        _ => {
            warn!("confirm rejected: no token");
            return Err(ApiError::bad_request("No confirmation token provided"));
        }
    };

    state.auth.confirm(token).await?;
    Ok(StatusCode::OK)
}

#[utoipa::path(
    post,
    path = "/login",
    request_body = CredentialsRequest,
    tag = "Auth",
    responses(
        (status = 200, description = "Session token issued", body = LoginResponse),
        (status = 400, description = "Invalid body"),
        (status = 401, description = "Invalid credentials or account not activated"),
        (status = 500, description = "Dependency failure")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, ApiError> {
    let request = credentials(payload)?;
    let token = state.auth.login(&request.email, &request.password).await?;
    Ok(Json(LoginResponse { token }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Role;
    use crate::storage::{Account, CredentialStore};
    use crate::test_support::test_app;

    fn body(email: &str, password: &str) -> Result<Json<CredentialsRequest>, JsonRejection> {
        Ok(Json(CredentialsRequest {
            email: email.to_string(),
            password: password.to_string(),
        }))
    }

    #[tokio::test]
    async fn register_returns_created() {
        let app = test_app();
        app.store
            .insert(Account::invited("u-1", "a@x.com", Role::from("employee")))
            .await;

        let status = register(State(app.state), body("a@x.com", "abcde123"))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(app.mailer.sent().len(), 1);
    }

    #[tokio::test]
    async fn register_with_blank_password_is_bad_request() {
        let app = test_app();
        let err = register(State(app.state), body("a@x.com", "")).await.unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn confirm_without_token_is_bad_request() {
        let app = test_app();
        let err = confirm(State(app.state.clone()), Query(ConfirmQuery { token: None }))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "No confirmation token provided");

        let err = confirm(
            State(app.state),
            Query(ConfirmQuery {
                token: Some(String::new()),
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn confirm_then_login_returns_token() {
        let app = test_app();
        app.store
            .insert(Account::invited("u-1", "a@x.com", Role::Admin))
            .await;
        register(State(app.state.clone()), body("a@x.com", "abcde123"))
            .await
            .unwrap();

        let link = app.mailer.sent()[0].1.clone();
        let token = link
            .query_pairs()
            .find(|(key, _)| key == "token")
            .map(|(_, value)| value.into_owned());
        let status = confirm(State(app.state.clone()), Query(ConfirmQuery { token }))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::OK);
        assert!(app.store.get_by_email("a@x.com").await.unwrap().activated);

        let Json(response) = login(State(app.state.clone()), body("a@x.com", "abcde123"))
            .await
            .unwrap();
        let claims = app.state.tokens.verify(&response.token).unwrap();
        assert_eq!(claims.user_id, "u-1");
    }

    #[tokio::test]
    async fn login_with_wrong_password_is_unauthorized() {
        let app = test_app();
        let err = login(State(app.state), body("ghost@x.com", "abcde123"))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
        assert_eq!(
            err.message,
            "Invalid email or password. Please check your credentials and try again."
        );
    }
}
