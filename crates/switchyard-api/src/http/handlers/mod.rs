//! HTTP request handlers for the REST API.

pub mod availability;
pub mod experiment;
