//! # Password Hashing
//!
//! Driver passwords are stored as PBKDF2-HMAC-SHA256 digests in the encoded form
//! `pbkdf2_sha256$<iterations>$<salt hex>$<hash hex>`. The iteration count travels with
//! the hash, so raising the configured work factor never invalidates stored passwords.

use anyhow::{anyhow, Result};
use rand::RngCore;
use sha2::Sha256;
use subtle::ConstantTimeEq;

const ALGORITHM: &str = "pbkdf2_sha256";
const SALT_LEN: usize = 16;
const HASH_LEN: usize = 32;

/// Hashes new passwords with a fixed work factor
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    iterations: u32,
}

impl PasswordHasher {
    pub fn new(iterations: u32) -> Self {
        Self { iterations }
    }

    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    /// Hash a raw password with a fresh random salt
    pub fn hash(&self, raw_password: &str) -> Result<String> {
        if self.iterations == 0 {
            return Err(anyhow!("Password hashing requires at least one iteration"));
        }

        let mut salt = [0u8; SALT_LEN];
        rand::thread_rng().fill_bytes(&mut salt);

        let digest = pbkdf2_sha256(raw_password.as_bytes(), &salt, self.iterations);

        Ok(format!(
            "{}${}${}${}",
            ALGORITHM,
            self.iterations,
            hex::encode(salt),
            hex::encode(digest)
        ))
    }

    /// A well-formed hash at this work factor that no real password was hashed into.
    /// Checking a password against it takes as long as checking a stored one.
    pub fn unusable_hash(&self) -> String {
        format!(
            "{}${}${}${}",
            ALGORITHM,
            self.iterations,
            hex::encode([0u8; SALT_LEN]),
            hex::encode([0u8; HASH_LEN])
        )
    }
}

/// Verify a raw password against an encoded hash.
/// Malformed hashes never verify.
pub fn verify_password(raw_password: &str, encoded: &str) -> bool {
    let mut parts = encoded.split('$');
    let (Some(algorithm), Some(iterations), Some(salt), Some(expected), None) = (
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
    ) else {
        return false;
    };

    if algorithm != ALGORITHM {
        return false;
    }

    let Ok(iterations) = iterations.parse::<u32>() else {
        return false;
    };
    let (Ok(salt), Ok(expected)) = (hex::decode(salt), hex::decode(expected)) else {
        return false;
    };
    if iterations == 0 || expected.len() != HASH_LEN {
        return false;
    }

    let digest = pbkdf2_sha256(raw_password.as_bytes(), &salt, iterations);
    digest.as_slice().ct_eq(expected.as_slice()).into()
}

fn pbkdf2_sha256(password: &[u8], salt: &[u8], iterations: u32) -> [u8; HASH_LEN] {
    let mut digest = [0u8; HASH_LEN];
    pbkdf2::pbkdf2_hmac::<Sha256>(password, salt, iterations, &mut digest);
    digest
}
