//! HTTP tests for booking and order lifecycle endpoints.

mod common;

use axum::http::StatusCode;
use common::*;
use rust_decimal::Decimal;
use serde_json::{json, Value};
use sqlx::PgPool;

/// A product with `stock` seats at 2999 on 2030-07-01.
async fn scheduled_product(pool: &PgPool, stock: i32) -> i64 {
    let product_id = seed_product(pool, MERCHANT_ID).await;
    let (status, _) = put_json(
        build_test_app(pool.clone()),
        &format!("/api/v1/products/{product_id}/schedule/2030-07-01"),
        &merchant_token(),
        json!({ "price": 2999, "total_stock": stock }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    product_id
}

fn booking(product_id: i64, adults: i32) -> Value {
    json!({
        "product_id": product_id,
        "travel_date": "2030-07-01",
        "adults": adults,
        "contact_name": "Liu Yang",
        "contact_phone": "13600000000",
    })
}

async fn book(pool: &PgPool, body: Value) -> (StatusCode, Value) {
    post_json(build_test_app(pool.clone()), "/api/v1/orders", &customer_token(), body).await
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn booking_snapshots_price(pool: PgPool) {
    let product_id = scheduled_product(&pool, 10).await;

    let mut body = booking(product_id, 2);
    body["children_no_bed"] = json!(1);
    body["infants"] = json!(1);
    let (status, json) = book(&pool, body).await;

    assert_eq!(status, StatusCode::CREATED);
    let order = &json["data"];
    assert_eq!(order["status"], "pending");
    assert_eq!(order["quantity"], 3);
    assert_eq!(order["customer_id"], CUSTOMER_ID);
    assert_eq!(decimal(&order["unit_price"]), Decimal::from(2999));
    assert_eq!(decimal(&order["total_price"]), Decimal::from(8997));
    assert!(order["order_number"].as_str().unwrap().starts_with("TB"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn last_seat_then_insufficient_stock(pool: PgPool) {
    let product_id = scheduled_product(&pool, 1).await;

    let (status, _) = book(&pool, booking(product_id, 1)).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, json) = book(&pool, booking(product_id, 1)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["code"], "INSUFFICIENT_STOCK");
    assert_eq!(json["details"]["available_stock"], 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn missing_schedule_and_bad_party(pool: PgPool) {
    let product_id = seed_product(&pool, MERCHANT_ID).await;

    let (status, json) = book(&pool, booking(product_id, 1)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "SCHEDULE_NOT_FOUND");

    let (status, json) = book(&pool, booking(product_id, 0)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn merchants_cannot_book(pool: PgPool) {
    let product_id = scheduled_product(&pool, 5).await;
    let (status, _) = post_json(
        build_test_app(pool),
        "/api/v1/orders",
        &merchant_token(),
        booking(product_id, 1),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn reject_restores_stock_and_cannot_repeat(pool: PgPool) {
    let product_id = scheduled_product(&pool, 10).await;
    let (_, json) = book(&pool, booking(product_id, 3)).await;
    let order_id = json["data"]["id"].as_i64().unwrap();
    let transition_uri = format!("/api/v1/orders/{order_id}/transition");

    let (status, json) = post_json(
        build_test_app(pool.clone()),
        &transition_uri,
        &merchant_token(),
        json!({ "status": "rejected", "reason": "Sold out offline" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["order"]["status"], "rejected");
    assert_eq!(json["data"]["stock_released"], 3);

    let (_, json) = get(
        build_test_app(pool.clone()),
        &format!("/api/v1/products/{product_id}/schedule"),
        &customer_token(),
    )
    .await;
    assert_eq!(json["data"][0]["available_stock"], 10);

    let (status, json) = post_json(
        build_test_app(pool.clone()),
        &transition_uri,
        &merchant_token(),
        json!({ "status": "confirmed" }),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["code"], "INVALID_TRANSITION");
    assert_eq!(json["details"]["from"], "rejected");

    let (status, json) = get(
        build_test_app(pool),
        &format!("/api/v1/orders/{order_id}/transitions"),
        &customer_token(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let history = json["data"].as_array().unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0]["from_status"], "pending");
    assert_eq!(history[0]["to_status"], "rejected");
    assert_eq!(history[0]["reason"], "Sold out offline");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_target_status_is_a_validation_error(pool: PgPool) {
    let product_id = scheduled_product(&pool, 10).await;
    let (_, json) = book(&pool, booking(product_id, 1)).await;
    let order_id = json["data"]["id"].as_i64().unwrap();

    let (status, json) = post_json(
        build_test_app(pool),
        &format!("/api/v1/orders/{order_id}/transition"),
        &merchant_token(),
        json!({ "status": "cancelled" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn orders_are_scoped_by_role(pool: PgPool) {
    let product_id = scheduled_product(&pool, 10).await;
    let (_, json) = book(&pool, booking(product_id, 1)).await;
    let order_id = json["data"]["id"].as_i64().unwrap();

    let (status, json) = get(
        build_test_app(pool.clone()),
        "/api/v1/orders",
        &customer_token(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"].as_array().unwrap().len(), 1);

    let (_, json) = get(build_test_app(pool.clone()), "/api/v1/orders", &merchant_token()).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);

    let stranger = token(CUSTOMER_ID + 1, "customer");
    let (_, json) = get(build_test_app(pool.clone()), "/api/v1/orders", &stranger).await;
    assert!(json["data"].as_array().unwrap().is_empty());

    let (status, json) = get(
        build_test_app(pool.clone()),
        &format!("/api/v1/orders/{order_id}"),
        &stranger,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");

    let admin = token(ADMIN_ID, "admin");
    let (status, json) = get(
        build_test_app(pool.clone()),
        &format!("/api/v1/orders/{order_id}"),
        &admin,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["id"], order_id);

    let (status, json) = get(
        build_test_app(pool),
        "/api/v1/orders?status=confirmed",
        &admin,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["data"].as_array().unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn agent_books_on_behalf_of_customer(pool: PgPool) {
    let product_id = scheduled_product(&pool, 10).await;
    let mut body = booking(product_id, 2);
    body["customer_id"] = json!(CUSTOMER_ID);

    let agent = token(AGENT_ID, "agent");
    let (status, json) =
        post_json(build_test_app(pool.clone()), "/api/v1/orders", &agent, body).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["data"]["agent_id"], AGENT_ID);
    assert_eq!(json["data"]["customer_id"], CUSTOMER_ID);

    let (_, json) = get(build_test_app(pool), "/api/v1/orders", &agent).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn lookup_by_order_number(pool: PgPool) {
    let product_id = scheduled_product(&pool, 10).await;
    let (_, json) = book(&pool, booking(product_id, 1)).await;
    let order_id = json["data"]["id"].as_i64().unwrap();
    let number = json["data"]["order_number"].as_str().unwrap().to_string();
    let uri = format!("/api/v1/orders/number/{number}");

    let (status, json) = get(build_test_app(pool.clone()), &uri, &customer_token()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["id"], order_id);
    assert_eq!(json["data"]["status"], "pending");

    let other = token(OTHER_MERCHANT_ID, "merchant");
    let (status, hidden) = get(build_test_app(pool.clone()), &uri, &other).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, unknown) = get(
        build_test_app(pool),
        "/api/v1/orders/number/TB00000000000000",
        &other,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(hidden, unknown);
}
