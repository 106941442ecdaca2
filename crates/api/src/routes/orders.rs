//! Route definitions for orders.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::orders;
use crate::state::AppState;

/// Order routes mounted at `/orders`.
///
/// ```text
/// GET    /                          -> list_orders
/// POST   /                          -> create_order
/// GET    /{order_id}                -> get_order
/// GET    /number/{order_number}     -> get_order_by_number
/// POST   /{order_id}/transition     -> transition_order
/// GET    /{order_id}/transitions    -> list_transitions
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::list_orders).post(orders::create_order))
        .route("/{order_id}", get(orders::get_order))
        .route("/number/{order_number}", get(orders::get_order_by_number))
        .route("/{order_id}/transition", post(orders::transition_order))
        .route("/{order_id}/transitions", get(orders::list_transitions))
}
