//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods. Reads
//! that stand alone take `&PgPool`; steps of a larger unit of work take
//! `&mut PgConnection` so callers can pass `&mut *tx`.

pub mod order_repo;
pub mod product_repo;
pub mod schedule_repo;
pub mod transition_repo;

pub use order_repo::OrderRepo;
pub use product_repo::ProductRepo;
pub use schedule_repo::ScheduleRepo;
pub use transition_repo::TransitionRepo;
