#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request};
use axum::response::Response;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use yamdb_api::auth::jwt::{generate_access_token, JwtConfig};
use yamdb_api::config::{ConfirmationConfig, ServerConfig};
use yamdb_api::router::{build_app_router, App};
use yamdb_api::state::AppState;
use yamdb_core::roles::Role;
use yamdb_db::models::user::{NewUser, User};
use yamdb_db::repositories::UserRepo;
use yamdb_mail::MemoryOutbox;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
        page_size: 10,
        jwt: JwtConfig {
            secret: "test-jwt-secret-that-is-long-enough".to_string(),
            access_token_expiry_mins: 60,
        },
        confirmation: ConfirmationConfig {
            secret: "test-confirmation-secret".to_string(),
            ttl_secs: 3600,
        },
    }
}

/// Build the full application with an in-memory outbox for confirmation
/// codes, using the given database pool.
///
/// Uses [`build_app_router`] so integration tests exercise the same
/// middleware stack (normalization, CORS, request ID, timeout, tracing,
/// panic recovery) that production uses.
pub fn build_test_app_with_outbox(pool: PgPool) -> (App, Arc<MemoryOutbox>) {
    let config = test_config();
    let outbox = Arc::new(MemoryOutbox::new());

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        mailer: outbox.clone(),
    };

    (build_app_router(state, &config), outbox)
}

pub fn build_test_app(pool: PgPool) -> App {
    build_test_app_with_outbox(pool).0
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Insert a user with the given role directly through the repository.
pub async fn create_user(pool: &PgPool, username: &str, role: Role) -> User {
    let input = NewUser {
        role,
        ..NewUser::signup(username, &format!("{username}@test.com"))
    };
    UserRepo::create(pool, &input)
        .await
        .expect("user creation should succeed")
}

/// A valid access token for `user`.
pub fn token_for(user: &User) -> String {
    generate_access_token(user.id, &test_config().jwt).expect("token generation should succeed")
}

/// Create a user with `role` and return an access token for it.
pub async fn user_token(pool: &PgPool, username: &str, role: Role) -> String {
    token_for(&create_user(pool, username, role).await)
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

async fn send(app: App, request: Request<Body>) -> Response {
    app.oneshot(request).await.expect("request should complete")
}

fn json_request(method: Method, uri: &str, token: Option<&str>, body: serde_json::Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    builder
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap()
}

fn empty_request(method: Method, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

pub async fn get(app: App, uri: &str) -> Response {
    send(app, empty_request(Method::GET, uri, None)).await
}

pub async fn get_auth(app: App, uri: &str, token: &str) -> Response {
    send(app, empty_request(Method::GET, uri, Some(token))).await
}

pub async fn post_json(app: App, uri: &str, body: serde_json::Value) -> Response {
    send(app, json_request(Method::POST, uri, None, body)).await
}

pub async fn post_json_auth(app: App, uri: &str, body: serde_json::Value, token: &str) -> Response {
    send(app, json_request(Method::POST, uri, Some(token), body)).await
}

pub async fn patch_json(app: App, uri: &str, body: serde_json::Value) -> Response {
    send(app, json_request(Method::PATCH, uri, None, body)).await
}

pub async fn patch_json_auth(app: App, uri: &str, body: serde_json::Value, token: &str) -> Response {
    send(app, json_request(Method::PATCH, uri, Some(token), body)).await
}

pub async fn delete(app: App, uri: &str) -> Response {
    send(app, empty_request(Method::DELETE, uri, None)).await
}

pub async fn delete_auth(app: App, uri: &str, token: &str) -> Response {
    send(app, empty_request(Method::DELETE, uri, Some(token))).await
}

/// Send a raw request (for malformed bodies or custom headers).
pub async fn send_raw(app: App, request: Request<Body>) -> Response {
    send(app, request).await
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be valid JSON")
}

// ---------------------------------------------------------------------------
// Catalog setup through the API
// ---------------------------------------------------------------------------

pub async fn create_genre(app: &App, admin: &str, name: &str, slug: &str) {
    let response = post_json_auth(
        app.clone(),
        "/v1/genres",
        serde_json::json!({ "name": name, "slug": slug }),
        admin,
    )
    .await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
}

pub async fn create_category(app: &App, admin: &str, name: &str, slug: &str) {
    let response = post_json_auth(
        app.clone(),
        "/v1/categories",
        serde_json::json!({ "name": name, "slug": slug }),
        admin,
    )
    .await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
}

/// Create a title through the API and return its id.
pub async fn create_title(app: &App, admin: &str, body: serde_json::Value) -> i64 {
    let response = post_json_auth(app.clone(), "/v1/titles", body, admin).await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    body_json(response).await["id"].as_i64().unwrap()
}

/// An admin token plus one title (genre `drama`, category `film`).
pub async fn seed_title(pool: &PgPool, app: &App) -> (String, i64) {
    let admin = user_token(pool, "seed_admin", Role::Admin).await;
    create_genre(app, &admin, "Drama", "drama").await;
    create_category(app, &admin, "Film", "film").await;
    let title_id = create_title(
        app,
        &admin,
        serde_json::json!({
            "name": "The Godfather",
            "year": 1972,
            "genre": ["drama"],
            "category": "film",
        }),
    )
    .await;
    (admin, title_id)
}
