//! Domain rules for the tour booking inventory engine.
//!
//! Pure functions and types only: nothing in this crate touches the
//! database or the network. The `db`, `booking`, and `api` crates build on
//! these rules so every layer agrees on statuses, prices, and stock math.

pub mod contact;
pub mod error;
pub mod order_number;
pub mod order_status;
pub mod party;
pub mod roles;
pub mod schedule;
pub mod types;
