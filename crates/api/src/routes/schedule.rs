//! Route definitions for product schedules.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::schedule;
use crate::state::AppState;

/// Schedule routes mounted at `/products`.
///
/// ```text
/// GET    /{product_id}/schedule                 -> get_schedule
/// POST   /{product_id}/schedule/batch           -> batch_upsert_schedule
/// PUT    /{product_id}/schedule/{travel_date}   -> upsert_schedule
/// DELETE /{product_id}/schedule/{travel_date}   -> delete_schedule
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{product_id}/schedule", get(schedule::get_schedule))
        .route(
            "/{product_id}/schedule/batch",
            post(schedule::batch_upsert_schedule),
        )
        .route(
            "/{product_id}/schedule/{travel_date}",
            put(schedule::upsert_schedule).delete(schedule::delete_schedule),
        )
}
