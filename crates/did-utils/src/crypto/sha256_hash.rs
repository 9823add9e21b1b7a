use sha2::{Digest, Sha256};

/// Compute the SHA256 hash of a given input.
pub fn sha256_hash(bytes: &[u8]) -> [u8; 32] {
    Sha256::digest(bytes).into()
}
