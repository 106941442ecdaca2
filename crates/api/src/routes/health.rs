use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Booking mode the engine is running in.
#[derive(Serialize)]
pub struct BookingHealth {
    /// Dates without a schedule entry are bookable at the base price.
    pub allow_unscheduled_booking: bool,
    /// Attempts after a lock or serialization conflict before giving up.
    pub max_conflict_retries: u32,
}

/// Body of `GET /health`.
#[derive(Serialize)]
pub struct HealthResponse {
    /// `ok` when the database answers, `degraded` otherwise.
    pub status: &'static str,
    pub version: &'static str,
    pub db_healthy: bool,
    pub booking: BookingHealth,
}

/// GET /health
///
/// Reservations cannot be taken while the database is unreachable, so
/// `degraded` means the service is up but not booking.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = tourbook_db::health_check(&state.pool).await.is_ok();
    if !db_healthy {
        tracing::warn!("Health check could not reach the database");
    }
    let booking = &state.config.booking;

    Json(HealthResponse {
        status: if db_healthy { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
        booking: BookingHealth {
            allow_unscheduled_booking: booking.allow_unscheduled_booking,
            max_conflict_retries: booking.max_conflict_retries,
        },
    })
}

/// `/health`, mounted at the root outside `/api/v1` and without auth.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
