//! Inventory reservation engine.
//!
//! - [`schedule_store::ScheduleStore`] -- per-date price/capacity CRUD.
//! - [`reservation::ReservationEngine`] -- atomic stock decrement + order insert.
//! - [`lifecycle::OrderLifecycle`] -- status transitions with stock release.
//! - [`visibility`] -- role-scoped order reads.
//!
//! Every write runs in one Postgres transaction that row-locks the schedule
//! entry it touches, with `lock_timeout` bounding the wait. Transaction
//! conflicts are retried a bounded number of times before surfacing as
//! [`CoreError::Conflict`](tourbook_core::error::CoreError::Conflict).

pub mod config;
pub mod error;
pub mod lifecycle;
pub mod reservation;
pub mod schedule_store;
pub mod visibility;

mod tx;

pub use config::BookingConfig;
pub use error::{BookingError, BookingResult};
pub use lifecycle::{OrderLifecycle, TransitionOutcome};
pub use reservation::{ReservationEngine, ReserveRequest};
pub use schedule_store::ScheduleStore;
