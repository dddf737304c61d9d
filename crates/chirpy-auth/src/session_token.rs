//! Session token issuance and verification.
//!
//! Session tokens are HS256 JWTs carrying `iss`, `sub`, `iat` and `exp`.
//! They are stateless: nothing is stored server-side, and a token dies
//! only when `exp` passes.

use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::errors::ErrorKind as JwtErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use chirpy_core::error::{AuthError, InternalError};
use chirpy_core::{Result, SessionToken, UserId};

/// Fixed `iss` claim of every session token.
pub const TOKEN_ISSUER: &str = "chirpy";

/// Claims carried by a session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    pub iss: String,
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

/// The result of a successful verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedSession {
    /// The user the token was issued to.
    pub subject: UserId,
    /// When the token was issued.
    pub issued_at: DateTime<Utc>,
    /// When the token stops being accepted.
    pub expires_at: DateTime<Utc>,
}

/// Signs and verifies session tokens with one symmetric secret.
///
/// Holds pre-built keys, so a long-lived codec avoids re-deriving them per
/// request. Safe to share across threads.
#[derive(Clone)]
pub struct SessionTokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl SessionTokenCodec {
    /// Create a codec for the given secret.
    ///
    /// # Errors
    ///
    /// Returns an internal error if the secret is empty.
    pub fn new(secret: &[u8]) -> Result<Self> {
        if secret.is_empty() {
            return Err(InternalError::Config {
                message: "session token secret must not be empty".to_string(),
            }
            .into());
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_issuer(&[TOKEN_ISSUER]);
        validation.set_required_spec_claims(&["exp", "iat", "iss", "sub"]);

        Ok(Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
        })
    }

    /// Issue a token for `subject` that expires `ttl` from now.
    ///
    /// A negative `ttl` yields a token that is already expired.
    ///
    /// # Errors
    ///
    /// Returns an internal error if `now + ttl` is not a representable
    /// instant or the signer fails.
    pub fn issue(&self, subject: &UserId, ttl: Duration) -> Result<SessionToken> {
        let now = Utc::now();
        let expires_at = now
            .checked_add_signed(ttl)
            .ok_or_else(|| InternalError::Signing {
                message: "token lifetime overflows the clock".to_string(),
            })?;

        let claims = SessionClaims {
            iss: TOKEN_ISSUER.to_string(),
            sub: subject.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| InternalError::Signing {
                message: e.to_string(),
            })?;

        Ok(SessionToken::new(token))
    }

    /// Verify a token and resolve its subject.
    ///
    /// # Errors
    ///
    /// - [`AuthError::TokenMalformed`] for empty or structurally invalid input
    /// - [`AuthError::TokenTampered`] if the signature does not match, including
    ///   a token signed with another secret
    /// - [`AuthError::TokenExpired`] once the current time reaches `exp`
    /// - [`AuthError::InvalidSubject`] for a foreign issuer or a subject that
    ///   is not a user id
    pub fn verify(&self, token: &str) -> Result<VerifiedSession> {
        if token.is_empty() {
            return Err(AuthError::TokenMalformed.into());
        }

        let data = jsonwebtoken::decode::<SessionClaims>(token, &self.decoding, &self.validation)
            .map_err(|e| {
                debug!(reason = ?e.kind(), "Session token rejected");
                map_jwt_error(e.kind())
            })?;

        let claims = data.claims;

        // jsonwebtoken only rejects exp < now; expiry is inclusive here.
        if claims.exp <= Utc::now().timestamp() {
            return Err(AuthError::TokenExpired.into());
        }

        let subject = UserId::parse(&claims.sub).map_err(|_| AuthError::InvalidSubject)?;
        let issued_at = timestamp(claims.iat)?;
        let expires_at = timestamp(claims.exp)?;

        Ok(VerifiedSession {
            subject,
            issued_at,
            expires_at,
        })
    }
}

impl fmt::Debug for SessionTokenCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionTokenCodec")
            .field("algorithm", &"HS256")
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

fn map_jwt_error(kind: &JwtErrorKind) -> AuthError {
    match kind {
        JwtErrorKind::InvalidSignature | JwtErrorKind::InvalidAlgorithm => AuthError::TokenTampered,
        JwtErrorKind::ExpiredSignature => AuthError::TokenExpired,
        JwtErrorKind::InvalidIssuer | JwtErrorKind::InvalidSubject => AuthError::InvalidSubject,
        _ => AuthError::TokenMalformed,
    }
}

fn timestamp(secs: i64) -> Result<DateTime<Utc>> {
    Utc.timestamp_opt(secs, 0)
        .single()
        .ok_or_else(|| AuthError::TokenMalformed.into())
}

/// Issue a session token for `subject`, signed with `secret`, valid for `ttl`.
pub fn issue_session_token(subject: &UserId, secret: &[u8], ttl: Duration) -> Result<SessionToken> {
    SessionTokenCodec::new(secret)?.issue(subject, ttl)
}

/// Verify a session token against `secret` and return its subject.
pub fn verify_session_token(token: &str, secret: &[u8]) -> Result<UserId> {
    Ok(SessionTokenCodec::new(secret)?.verify(token)?.subject)
}
