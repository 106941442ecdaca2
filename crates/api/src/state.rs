use std::sync::Arc;

use tourbook_booking::{OrderLifecycle, ReservationEngine, ScheduleStore};

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheap to clone: the pool and services are reference-counted internally.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: tourbook_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    pub schedule_store: ScheduleStore,
    pub reservations: ReservationEngine,
    pub lifecycle: OrderLifecycle,
}

impl AppState {
    /// Wire the booking services onto one pool.
    pub fn new(pool: tourbook_db::DbPool, config: ServerConfig) -> Self {
        let booking = config.booking.clone();
        Self {
            schedule_store: ScheduleStore::new(pool.clone(), booking.clone()),
            reservations: ReservationEngine::new(pool.clone(), booking.clone()),
            lifecycle: OrderLifecycle::new(pool.clone(), booking),
            config: Arc::new(config),
            pool,
        }
    }
}
