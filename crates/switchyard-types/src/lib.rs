//! Shared domain types for Switchyard.
//!
//! Experiments and their variant assignments, bookable time slots and
//! pagination, service configuration, and the error enums shared by the
//! core and infra crates.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror.

pub mod config;
pub mod error;
pub mod experiment;
pub mod slot;
