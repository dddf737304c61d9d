//! One-way password hashing and verification.
//!
//! Passwords are hashed with bcrypt at a fixed work factor. The output is
//! the self-describing `$2b$<cost>$<salt><digest>` string, which is stored
//! and later handed back to [`check_password`] unmodified.

use tracing::warn;

use chirpy_core::error::{AuthError, InternalError};
use chirpy_core::{HashedPassword, Result};

/// bcrypt work factor. Fixed for the whole system, not configurable.
pub const PASSWORD_COST: u32 = 10;

/// Hash a password with a fresh random salt.
///
/// No length cap is applied here. bcrypt itself only reads the first
/// 72 bytes of the secret.
///
/// # Errors
///
/// Returns an internal error if the hashing primitive fails.
pub fn hash_password(secret: &str) -> Result<HashedPassword> {
    let hash = bcrypt::hash(secret, PASSWORD_COST).map_err(|e| InternalError::Hashing {
        message: e.to_string(),
    })?;

    Ok(HashedPassword::new(hash))
}

/// Verify a password attempt against a stored hash.
///
/// The digest comparison inside bcrypt does not short-circuit on the first
/// differing byte. A wrong password and a corrupt stored hash both come back
/// as [`AuthError::InvalidCredentials`]; callers cannot tell them apart.
pub fn check_password(stored: &HashedPassword, attempt: &str) -> Result<()> {
    match bcrypt::verify(attempt, stored.as_str()) {
        Ok(true) => Ok(()),
        Ok(false) => Err(AuthError::InvalidCredentials.into()),
        Err(e) => {
            warn!(error = %e, "Stored password hash is unreadable");
            Err(AuthError::InvalidCredentials.into())
        }
    }
}
