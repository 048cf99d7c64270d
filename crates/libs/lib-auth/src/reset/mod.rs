//! # Password Reset Tokens
//!
//! A reset token is 32 random bytes, base64url-encoded for the reset link.
//! Only its Argon2 hash is persisted; expiry and single use are enforced by the
//! caller against the stored row.

use argon2::password_hash::rand_core::{OsRng, RngCore};
use lib_utils::{b64u_decode, b64u_encode};

use crate::pwd::{hash_secret, verify_secret};

const RESET_TOKEN_BYTES: usize = 32;

/// Plaintext token for the mail channel plus the hash to store.
#[derive(Debug, Clone)]
pub struct ResetToken {
    pub plain: String,
    pub hash: String,
}

/// Generate a new reset token.
pub fn generate_reset_token() -> Result<ResetToken, String> {
    let mut bytes = [0u8; RESET_TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);

    let plain = b64u_encode(bytes);
    let hash = hash_secret(&plain)?;

    Ok(ResetToken { plain, hash })
}

/// Check a presented token against the stored hash.
///
/// Tokens that are not well-formed base64url of the right length never match.
pub fn verify_reset_token(presented: &str, stored_hash: &str) -> Result<bool, String> {
    match b64u_decode(presented) {
        Ok(bytes) if bytes.len() == RESET_TOKEN_BYTES => verify_secret(presented, stored_hash),
        _ => Ok(false),
    }
}
