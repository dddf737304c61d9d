//! Opaque refresh token generation.

use rand::RngCore;
use rand::rngs::OsRng;

use chirpy_core::error::InternalError;
use chirpy_core::{REFRESH_TOKEN_BYTES, RefreshToken, Result};

/// Generate a refresh token from 32 bytes of OS randomness, hex-encoded.
///
/// The result is always 64 lower-case hex characters and embeds no claims.
///
/// # Errors
///
/// Returns an internal error if the OS random source cannot fill the
/// buffer. There is no fallback to a weaker source or a shorter token.
pub fn generate_refresh_token() -> Result<RefreshToken> {
    let mut bytes = [0u8; REFRESH_TOKEN_BYTES];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| InternalError::Randomness {
            message: e.to_string(),
        })?;

    RefreshToken::parse(hex::encode(bytes))
}
