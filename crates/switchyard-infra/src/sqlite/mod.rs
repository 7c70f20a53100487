//! SQLite storage layer.
//!
//! Slot repository backed by SQLite with WAL mode and split read/write
//! connection pools, plus idempotent slot seeding.

pub mod pool;
pub mod seed;
pub mod slot;
