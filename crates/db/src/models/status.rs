//! Status lookup helpers.
//!
//! The `order_statuses` seed order matches the discriminants of
//! [`OrderStatus`]; rows store the SMALLINT id and convert at the edge.

pub use tourbook_core::order_status::{OrderStatus, StatusId};
