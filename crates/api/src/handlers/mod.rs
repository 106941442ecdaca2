pub mod orders;
pub mod schedule;
