//! Business logic and repository trait definitions for Switchyard.
//!
//! This crate defines the "ports" (repository and hasher traits) that the
//! infrastructure layer implements. It depends only on `switchyard-types` --
//! never on `switchyard-infra` or any database/IO crate.

pub mod repository;
pub mod service;
