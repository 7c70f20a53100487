//! Cryptographic operations for Switchyard.
//!
//! - `hash`: SHA-256 digests for experiment bucketing

pub mod hash;
