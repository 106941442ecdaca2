//! Shared helpers for API integration tests.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use rust_decimal::Decimal;
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;

use tourbook_api::auth::jwt::{generate_access_token, JwtConfig};
use tourbook_api::config::{LogFormat, ServerConfig};
use tourbook_api::router::build_app_router;
use tourbook_api::state::AppState;
use tourbook_booking::BookingConfig;

pub const MERCHANT_ID: i64 = 100;
pub const OTHER_MERCHANT_ID: i64 = 101;
pub const CUSTOMER_ID: i64 = 200;
pub const AGENT_ID: i64 = 300;
pub const ADMIN_ID: i64 = 1;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        log_format: LogFormat::Pretty,
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            access_token_expiry_mins: 15,
        },
        booking: BookingConfig::default(),
    }
}

/// Build the full application router, exactly as `main.rs` does.
pub fn build_test_app(pool: PgPool) -> Router {
    build_app_router(AppState::new(pool, test_config()))
}

/// A bearer token for `user_id` acting as `role`.
pub fn token(user_id: i64, role: &str) -> String {
    generate_access_token(user_id, role, &test_config().jwt).unwrap()
}

pub fn merchant_token() -> String {
    token(MERCHANT_ID, "merchant")
}

pub fn customer_token() -> String {
    token(CUSTOMER_ID, "customer")
}

/// Insert a product owned by `merchant_id` and return its id.
pub async fn seed_product(pool: &PgPool, merchant_id: i64) -> i64 {
    let (id,): (i64,) = sqlx::query_as(
        "INSERT INTO products (merchant_id, title, base_price) \
         VALUES ($1, 'Yellow Mountain tour', 1200) RETURNING id",
    )
    .bind(merchant_id)
    .fetch_one(pool)
    .await
    .unwrap();
    id
}

/// Read a money field, serialized either as a string or a number.
pub fn decimal(value: &Value) -> Decimal {
    match value {
        Value::String(s) => s.parse().unwrap(),
        other => other.to_string().parse().unwrap(),
    }
}

/// Collect a response body into JSON.
pub async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn send(
    app: Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

pub async fn get(app: Router, uri: &str, token: &str) -> (StatusCode, Value) {
    send(app, "GET", uri, Some(token), None).await
}

pub async fn get_anonymous(app: Router, uri: &str) -> (StatusCode, Value) {
    send(app, "GET", uri, None, None).await
}

pub async fn post_json(app: Router, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
    send(app, "POST", uri, Some(token), Some(body)).await
}

pub async fn put_json(app: Router, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
    send(app, "PUT", uri, Some(token), Some(body)).await
}

pub async fn delete(app: Router, uri: &str, token: &str) -> (StatusCode, Value) {
    send(app, "DELETE", uri, Some(token), None).await
}
