//! Auth subsystem configuration.

use chrono::Duration;
use std::fmt;

use chirpy_core::error::InternalError;
use chirpy_core::{ApiKey, Result};

/// Lifetime of a session token.
pub fn session_token_ttl() -> Duration {
    Duration::hours(1)
}

/// Lifetime of a refresh token, counted from issuance.
pub fn refresh_token_ttl() -> Duration {
    Duration::days(60)
}

/// Configuration injected into [`AuthService`](crate::AuthService).
///
/// Built once at startup and passed in explicitly; nothing in this crate
/// reads process-wide state.
///
/// # Example
///
/// ```
/// use chirpy_auth::AuthConfig;
///
/// let config = AuthConfig::new("a-long-random-secret", Some("operator-key".into())).unwrap();
/// assert_eq!(config.session_ttl().num_hours(), 1);
/// assert_eq!(config.refresh_ttl().num_days(), 60);
/// ```
#[derive(Clone)]
pub struct AuthConfig {
    token_secret: Vec<u8>,
    api_key: Option<ApiKey>,
    session_ttl: Duration,
    refresh_ttl: Duration,
}

impl AuthConfig {
    /// Create a configuration with the fixed token lifetimes.
    ///
    /// # Arguments
    ///
    /// * `token_secret` - HMAC key for session tokens
    /// * `api_key` - operator key accepted by the webhook endpoint, if any
    ///
    /// # Errors
    ///
    /// Returns an internal configuration error if the secret or the key is empty.
    pub fn new(token_secret: impl Into<Vec<u8>>, api_key: Option<String>) -> Result<Self> {
        let token_secret = token_secret.into();

        if token_secret.is_empty() {
            return Err(InternalError::Config {
                message: "token secret must not be empty".to_string(),
            }
            .into());
        }

        if api_key.as_deref() == Some("") {
            return Err(InternalError::Config {
                message: "API key must not be empty when set".to_string(),
            }
            .into());
        }

        Ok(Self {
            token_secret,
            api_key: api_key.map(ApiKey::new),
            session_ttl: session_token_ttl(),
            refresh_ttl: refresh_token_ttl(),
        })
    }

    /// Returns the session token signing secret.
    pub fn token_secret(&self) -> &[u8] {
        &self.token_secret
    }

    /// Returns the configured operator API key.
    pub fn api_key(&self) -> Option<&ApiKey> {
        self.api_key.as_ref()
    }

    /// Returns the session token lifetime.
    pub fn session_ttl(&self) -> Duration {
        self.session_ttl
    }

    /// Returns the refresh token lifetime.
    pub fn refresh_ttl(&self) -> Duration {
        self.refresh_ttl
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("token_secret", &"[REDACTED]")
            .field("api_key", &self.api_key)
            .field("session_ttl", &self.session_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish()
    }
}
