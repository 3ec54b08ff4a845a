//! Stable SHA-256 digests of canonical JSON and token streams.

use mcg_core::{McgError, Token};
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::serde::to_canonical_json_bytes;

/// Computes a stable SHA-256 hex digest of a value's canonical JSON form.
pub fn stable_hash_string<T: Serialize>(value: &T) -> Result<String, McgError> {
    let bytes = to_canonical_json_bytes(value)?;
    Ok(hex::encode(Sha256::digest(&bytes)))
}

/// Digest of a token stream in reading order.
pub fn token_stream_digest(tokens: &[Token]) -> Result<String, McgError> {
    stable_hash_string(&tokens)
}
