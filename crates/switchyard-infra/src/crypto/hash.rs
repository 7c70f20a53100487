//! SHA-256 digests for experiment bucketing.

use sha2::{Digest, Sha256};

use switchyard_core::service::hash::ContentHasher;

/// `ContentHasher` backed by `sha2`. Output is 64 lowercase hex characters.
#[derive(Debug, Default, Clone, Copy)]
pub struct Sha256ContentHasher;

impl Sha256ContentHasher {
    pub fn new() -> Self {
        Self
    }
}

impl ContentHasher for Sha256ContentHasher {
    fn compute_hash(&self, content: &str) -> String {
        format!("{:x}", Sha256::digest(content.as_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use switchyard_core::service::bucketer::bucket_position;

    #[test]
    fn test_known_bucket_key_digest() {
        assert_eq!(
            Sha256ContentHasher::new().compute_hash("u1_split"),
            "128eb3101b1b8311aaabdce4c31489e201fdeb4396569e9b274c099b26b4c3df"
        );
    }

    #[test]
    fn test_digest_shape() {
        let digest = Sha256ContentHasher.compute_hash("user_42_new-signup-flow");
        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f')));
    }

    #[test]
    fn test_positions_from_real_digests() {
        let hasher = Sha256ContentHasher;
        assert_eq!(bucket_position(&hasher, "split", "u1"), 39);
        assert_eq!(bucket_position(&hasher, "new-signup-flow", "1"), 75);
        assert_eq!(bucket_position(&hasher, "new-signup-flow", "user_0"), 17);
    }
}
