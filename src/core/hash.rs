// Hashing utilities

use crate::core::Hash256;
use sha2::{Digest, Sha256};

/// SHA256 double hash (Bitcoin convention)
/// hash256 = SHA256(SHA256(data))
pub fn hash256(data: &[u8]) -> Hash256 {
    let first_hash = Sha256::digest(data);
    let second_hash = Sha256::digest(first_hash);
    Hash256::new(second_hash.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash256_empty() {
        // Raw digest order, not display order
        assert_eq!(
            hex::encode(hash256(b"").as_bytes()),
            "5df6e0e2761359d30a8275058e299fcc0381534545f55cf43e41983f5d4c9456"
        );
    }

    #[test]
    fn test_hash256_hello() {
        assert_eq!(
            hex::encode(hash256(b"hello").as_bytes()),
            "9595c9df90075148eb06860365df33584b75bff782a510c6cd4883a419833d50"
        );
    }

    #[test]
    fn test_hash256_deterministic() {
        let data = b"hello world";
        assert_eq!(hash256(data), hash256(data));
        assert_ne!(hash256(data), hash256(b"hello worle"));
    }
}
