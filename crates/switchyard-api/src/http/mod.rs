//! HTTP/REST API layer for Switchyard.
//!
//! Axum-based JSON API: experiment assignment (`/assign`) and meeting slot
//! availability and booking (`/availability`).

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod router;
