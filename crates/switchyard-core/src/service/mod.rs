//! Domain services.

pub mod bucketer;
pub mod hash;
pub mod slot;
