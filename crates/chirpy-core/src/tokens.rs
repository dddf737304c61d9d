//! Token types for chirpy authentication.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, InvalidInputError};

/// Number of random bytes behind a refresh token.
pub const REFRESH_TOKEN_BYTES: usize = 32;

/// Length of a refresh token in its hex-encoded form.
pub const REFRESH_TOKEN_LEN: usize = REFRESH_TOKEN_BYTES * 2;

/// A signed session token (HS256 JWT) proving recent authentication.
///
/// # Security
///
/// - Never logged or displayed in Debug output
/// - Verify with the session token codec; never trust its claims unverified
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    /// Wrap an encoded token.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the encoded token for use in `Authorization: Bearer` headers.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the wrapper, returning the encoded token.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SessionToken").field(&"[REDACTED]").finish()
    }
}

/// An opaque refresh token: 32 random bytes as 64 lower-case hex characters.
///
/// Carries no claims. Its meaning (owner, expiry, revocation) lives entirely
/// in the store record keyed by this value.
///
/// # Security
///
/// Never logged or displayed in Debug output.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RefreshToken(String);

impl RefreshToken {
    /// Parse a refresh token presented by a client or loaded from storage.
    ///
    /// # Errors
    ///
    /// Returns an error unless the value is exactly 64 lower-case hex characters.
    /// The rejected value is not echoed in the error.
    pub fn parse(s: impl Into<String>) -> Result<Self, Error> {
        let s = s.into();

        if s.len() != REFRESH_TOKEN_LEN {
            return Err(InvalidInputError::RefreshToken {
                reason: format!("expected {} characters, got {}", REFRESH_TOKEN_LEN, s.len()),
            }
            .into());
        }

        if !s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f')) {
            return Err(InvalidInputError::RefreshToken {
                reason: "must be lower-case hex".to_string(),
            }
            .into());
        }

        Ok(Self(s))
    }

    /// Returns the token value for store lookups and response bodies.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for RefreshToken {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

impl From<RefreshToken> for String {
    fn from(token: RefreshToken) -> Self {
        token.0
    }
}

impl fmt::Debug for RefreshToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RefreshToken").field(&"[REDACTED]").finish()
    }
}

/// The static operator secret accepted by the webhook endpoint.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Wrap a configured key.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Returns the key value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ApiKey").field(&"[REDACTED]").finish()
    }
}
