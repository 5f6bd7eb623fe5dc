// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    body::Body,
    http::Request,
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::{debug_span, Span};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::require_admin,
    error::ApiError,
    models::{CredentialsRequest, LoginResponse},
    state::AppState,
};

pub mod auth;
pub mod health;
pub mod users;

pub fn router(state: AppState) -> Router {
    // Everything under /api, including unknown paths, goes through the gate.
    let api_routes = Router::new()
        .route("/me", get(users::get_current_user))
        .fallback(api_not_found)
        .layer(from_fn_with_state(state.clone(), require_admin));

    Router::new()
        .route("/register", post(auth::register))
        .route("/confirm", get(auth::confirm))
        .route("/login", post(auth::login))
        .route("/health", get(health::health))
        .nest("/api", api_routes)
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(TraceLayer::new_for_http().make_span_with(make_span))
                .layer(CorsLayer::permissive()),
        )
}

async fn api_not_found() -> ApiError {
    ApiError::not_found("Not found")
}

// Headers are left out: Authorization carries bearer tokens.
fn make_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|val| val.to_str().ok())
        .unwrap_or("none");

    debug_span!(
        "http-request",
        method = %request.method(),
        path = request.uri().path(),
        request_id
    )
}

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        auth::register,
        auth::confirm,
        auth::login,
        health::health,
        users::get_current_user
    ),
    components(
        schemas(
            CredentialsRequest,
            LoginResponse,
            health::HealthResponse,
            users::UserMeResponse
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "Auth", description = "Registration, email confirmation and login"),
        (name = "Users", description = "Administrator identity"),
        (name = "Health", description = "Liveness probe")
    )
)]
struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Role;
    use crate::storage::{Account, CredentialStore, StoreWrite};
    use crate::test_support::{test_app, TestApp};
    use axum::{
        body::to_bytes,
        http::{header, Method, StatusCode},
    };
    use chrono::Duration;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn send(app: &TestApp, request: Request<Body>) -> (StatusCode, Value) {
        let response = router(app.state.clone()).oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_me(authorization: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri("/api/me");
        if let Some(value) = authorization {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        builder.body(Body::empty()).unwrap()
    }

    fn credentials(email: &str, password: &str) -> Value {
        json!({ "email": email, "password": password })
    }

    #[tokio::test]
    async fn gate_forbids_valid_non_admin_token() {
        let app = test_app();
        let token = app
            .state
            .tokens
            .issue_session("u-1", "a@x.com", &Role::from("employee"))
            .unwrap();

        let (status, body) = send(&app, get_me(Some(&format!("Bearer {token}")))).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"], "Forbidden. User is not an admin");
        assert_eq!(body["error_code"], "forbidden");
    }

    #[tokio::test]
    async fn gate_rejects_missing_header() {
        let app = test_app();
        let (status, body) = send(&app, get_me(None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Authorization header missing");
    }

    #[tokio::test]
    async fn gate_rejects_expired_admin_token() {
        let app = test_app();
        let token = app
            .state
            .tokens
            .issue("u-1", "a@x.com", &Role::Admin, Duration::seconds(-1))
            .unwrap();

        let (status, body) = send(&app, get_me(Some(&format!("Bearer {token}")))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Invalid token");
    }

    #[tokio::test]
    async fn gate_rejects_garbage_token() {
        let app = test_app();
        let (status, body) = send(&app, get_me(Some("Bearer garbage"))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error_code"], "invalid_token");
    }

    #[tokio::test]
    async fn confirm_with_valid_token_activates_in_order() {
        let app = test_app();
        app.store
            .insert(Account::invited("u-1", "a@x.com", Role::from("employee")))
            .await;
        let token = app
            .state
            .tokens
            .issue("u-1", "a@x.com", &Role::from("employee"), Duration::minutes(5))
            .unwrap();

        let request = Request::builder()
            .uri(format!("/confirm?token={token}"))
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(&app, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            app.store.writes().await,
            vec![
                StoreWrite::Activated { email: "a@x.com".to_string(), value: true },
                StoreWrite::PasswordSetFlag { email: "a@x.com".to_string(), value: true },
            ]
        );
    }

    #[tokio::test]
    async fn gate_guards_unknown_api_paths() {
        let app = test_app();
        let request = Request::builder()
            .uri("/api/departments")
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(&app, request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn admin_reaches_me_with_identity_from_token() {
        let app = test_app();
        let token = app
            .state
            .tokens
            .issue_session("u-1", "a@x.com", &Role::Admin)
            .unwrap();

        let (status, body) = send(&app, get_me(Some(&format!("Bearer {token}")))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["user_id"], "u-1");
        assert_eq!(body["email"], "a@x.com");
        assert_eq!(body["role"], "admin");

        let expires_at = body["expires_at"].as_str().unwrap();
        let expires_at = chrono::DateTime::parse_from_rfc3339(expires_at).unwrap();
        assert!(expires_at > chrono::Utc::now() + Duration::hours(23));
    }

    #[tokio::test]
    async fn register_unknown_email_is_not_found() {
        let app = test_app();
        let (status, body) = send(
            &app,
            post_json("/register", credentials("ghost@x.com", "abcde123")),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(
            body["error"],
            "User not found. Please contact your company administrator."
        );
    }

    #[tokio::test]
    async fn register_fully_registered_is_conflict() {
        let app = test_app();
        let mut account = Account::invited("u-1", "a@x.com", Role::Admin);
        account.activated = true;
        account.is_password_set = true;
        app.store.insert(account).await;

        let (status, _) = send(
            &app,
            post_json("/register", credentials("a@x.com", "abcde123")),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn register_weak_passwords_are_bad_request() {
        let app = test_app();
        app.store
            .insert(Account::invited("u-1", "a@x.com", Role::from("employee")))
            .await;

        let (status, body) = send(&app, post_json("/register", credentials("a@x.com", "abc"))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "password must be at least 5 characters long");

        let (status, body) =
            send(&app, post_json("/register", credentials("a@x.com", "abcde1"))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "password must contain at least 3 digits");
    }

    #[tokio::test]
    async fn register_valid_password_is_created() {
        let app = test_app();
        app.store
            .insert(Account::invited("u-1", "a@x.com", Role::from("employee")))
            .await;

        let (status, body) = send(
            &app,
            post_json("/register", credentials("a@x.com", "abcde123")),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body, Value::Null);

        let account = app.store.get_by_email("a@x.com").await.unwrap();
        assert!(account.password_hash.is_some());
        assert!(!account.activated);
        assert_eq!(app.mailer.sent().len(), 1);
    }

    #[tokio::test]
    async fn malformed_body_is_bad_request() {
        let app = test_app();
        let request = Request::builder()
            .method(Method::POST)
            .uri("/login")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();

        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid request body");
    }

    #[tokio::test]
    async fn confirm_with_expired_token_is_bad_request() {
        let app = test_app();
        app.store
            .insert(Account::invited("u-1", "a@x.com", Role::from("employee")))
            .await;
        let token = app
            .state
            .tokens
            .issue("u-1", "a@x.com", &Role::from("employee"), Duration::seconds(-1))
            .unwrap();

        let request = Request::builder()
            .uri(format!("/confirm?token={token}"))
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid or expired token");
        assert!(app.store.writes().await.is_empty());
    }

    #[tokio::test]
    async fn login_before_confirmation_is_unauthorized() {
        let app = test_app();
        app.store
            .insert(Account::invited("u-1", "a@x.com", Role::from("employee")))
            .await;
        let (status, _) = send(
            &app,
            post_json("/register", credentials("a@x.com", "abcde123")),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) =
            send(&app, post_json("/login", credentials("a@x.com", "abcde123"))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Password not set. Please register first!");
    }

    #[tokio::test]
    async fn responses_carry_a_request_id() {
        let app = test_app();
        let response = router(app.state.clone())
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
    }

    #[test]
    fn openapi_lists_public_and_admin_paths() {
        let doc = ApiDoc::openapi();
        for path in ["/register", "/confirm", "/login", "/health", "/api/me"] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
