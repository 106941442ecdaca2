pub mod health;
pub mod orders;
pub mod schedule;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /products/{product_id}/schedule                 GET (any authenticated user)
/// /products/{product_id}/schedule/{travel_date}   PUT, DELETE (owning merchant or admin)
/// /products/{product_id}/schedule/batch           POST (owning merchant or admin)
///
/// /orders                                         GET (role-scoped), POST (customer/agent/admin)
/// /orders/{order_id}                              GET (role-scoped)
/// /orders/number/{order_number}                   GET (role-scoped)
/// /orders/{order_id}/transition                   POST (owning merchant or admin)
/// /orders/{order_id}/transitions                  GET (role-scoped)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/products", schedule::router())
        .nest("/orders", orders::router())
}
