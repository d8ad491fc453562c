//! Cryptographic utilities shared across Threadline crates
//!
//! Provides secret generation plus hashing and verification using SHA-256
//! with random salts and constant-time comparison to prevent timing attacks.

use rand::{distributions::Alphanumeric, Rng};
use sha2::{Digest, Sha256};

/// Length of the salt mixed into stored key hashes
const SALT_LENGTH: usize = 16;

/// Generate a random alphanumeric secret of the given length
pub fn generate_secret(length: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

/// Hash a secret for storage.
///
/// The output format is `hex(salt):hex(sha256(key || salt))`.
pub fn hash_key(key: &str) -> String {
    let salt: [u8; SALT_LENGTH] = rand::thread_rng().gen();
    format!("{}:{}", hex::encode(salt), hex::encode(digest(key, &salt)))
}

/// Verify a secret against a stored hash using constant-time comparison.
///
/// The stored hash format is `hex(salt):hex(sha256(key || salt))`.
pub fn verify_key_hash(candidate_key: &str, stored_hash: &str) -> bool {
    let Some((salt_hex, hash_hex)) = stored_hash.split_once(':') else {
        return false;
    };

    let salt = match hex::decode(salt_hex) {
        Ok(salt) => salt,
        Err(_) => return false,
    };

    let hash = match hex::decode(hash_hex) {
        Ok(hash) => hash,
        Err(_) => return false,
    };

    let candidate_hash = digest(candidate_key, &salt);

    if hash.len() != candidate_hash.len() {
        return false;
    }

    let mut result = 0u8;
    for (a, b) in hash.iter().zip(candidate_hash.iter()) {
        result |= a ^ b;
    }
    result == 0
}

fn digest(key: &str, salt: &[u8]) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(key.as_bytes());
    hasher.update(salt);
    hasher.finalize().to_vec()
}
