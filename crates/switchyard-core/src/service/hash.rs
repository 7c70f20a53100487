//! ContentHasher trait for computing digests.
//!
//! Defined in switchyard-core so the bucketer can hash user/experiment keys
//! without coupling to a specific algorithm. The `Sha256ContentHasher`
//! adapter lives in switchyard-infra.

/// Abstraction over content hashing.
pub trait ContentHasher: Send + Sync {
    /// Compute a lowercase hex-encoded hash of the given content.
    fn compute_hash(&self, content: &str) -> String;
}
