//! Bearer token generation and hashing.

use std::fmt::Write as _;

use rand::{RngCore, rngs::OsRng};
use sha2::{Digest, Sha256};

/// Bearer token prefix.
pub const BEARER_TOKEN_PREFIX: &str = "bg";

/// Number of random secret bytes encoded in a token.
pub const TOKEN_SECRET_BYTES: usize = 32;

/// Generate an opaque `bg_<hex>` bearer token.
#[must_use]
pub fn generate_token() -> String {
    let mut secret = [0_u8; TOKEN_SECRET_BYTES];
    OsRng.fill_bytes(&mut secret);

    format!("{BEARER_TOKEN_PREFIX}_{}", hex(&secret))
}

/// Only the SHA-256 digest of a token is ever stored.
#[must_use]
pub fn hash_token(token: &str) -> String {
    format!("{:x}", Sha256::digest(token.as_bytes()))
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().fold(
        String::with_capacity(bytes.len() * 2),
        |mut out, byte| {
            let _ = write!(out, "{byte:02x}");
            out
        },
    )
}
