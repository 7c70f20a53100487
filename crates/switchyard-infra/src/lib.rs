//! Infrastructure layer for Switchyard.
//!
//! Contains implementations of the traits defined in `switchyard-core`:
//! SQLite slot storage, SHA-256 hashing for experiment bucketing, plus
//! config file loading and slot seeding.

pub mod config;
pub mod crypto;
pub mod sqlite;
