//! API token generation and hashing.

use rand::{RngCore, rngs::OsRng};
use sha2::{Digest, Sha256};

/// API token identifier prefix.
pub const API_TOKEN_PREFIX: &str = "bg";

/// Number of secret bytes encoded in a token.
pub const API_TOKEN_SECRET_BYTES: usize = 32;

/// Generate a new raw API token.
#[must_use]
pub fn generate_api_token() -> String {
    let mut bytes = [0_u8; API_TOKEN_SECRET_BYTES];
    OsRng.fill_bytes(&mut bytes);

    format!("{API_TOKEN_PREFIX}_{}", hex_encode(&bytes))
}

/// Hash a raw API token for storage and lookup.
#[must_use]
pub fn hash_api_token(token: &str) -> String {
    format!("{:x}", Sha256::digest(token.as_bytes()))
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|byte| format!("{byte:02x}")).collect()
}
