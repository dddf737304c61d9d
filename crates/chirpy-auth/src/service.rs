//! The composed authentication flows.
//!
//! [`AuthService`] is a request-scoped facade: each method runs one flow
//! (login, refresh, revoke, authorize) from start to a verified identity or
//! a typed failure. It holds no mutable state; the only shared state is the
//! refresh-token record in the store.

use chrono::Utc;
use http::HeaderMap;
use sha2::{Digest, Sha256};
use tracing::{debug, info, instrument, warn};

use chirpy_core::error::{AuthError, InvalidInputError};
use chirpy_core::{
    Credentials, RefreshToken, RefreshTokenRecord, RefreshTokenStore, Result, SessionToken,
    UserId, UserRecord, UserStore,
};

use crate::config::AuthConfig;
use crate::extract::{extract_api_key, extract_bearer};
use crate::password::{check_password, hash_password};
use crate::refresh_token::generate_refresh_token;
use crate::session_token::SessionTokenCodec;

/// Payment provider event that grants premium membership.
pub const UPGRADE_EVENT: &str = "user.upgraded";

/// Output of a successful login.
#[derive(Debug, Clone)]
pub struct LoginOutput {
    /// The authenticated user.
    pub user: UserRecord,
    /// Session token, valid for one hour.
    pub session_token: SessionToken,
    /// Refresh token, valid for sixty days or until revoked.
    pub refresh_token: RefreshToken,
}

/// What a payment webhook call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebhookOutcome {
    /// The user was marked as a premium member.
    Upgraded(UserId),
    /// The event is not one we act on; acknowledged and dropped.
    Ignored,
}

/// Login, refresh, revoke and authorization flows over a store.
///
/// # Example
///
/// ```no_run
/// use chirpy_auth::{AuthConfig, AuthService};
/// use chirpy_core::Credentials;
/// use chirpy_file::FileStore;
///
/// # async fn example() -> chirpy_core::Result<()> {
/// let config = AuthConfig::new("secret", None)?;
/// let service = AuthService::new(config, FileStore::new("./chirpy-data"))?;
///
/// let login = service
///     .login(&Credentials::new("alice@example.com", "hunter2"))
///     .await?;
/// let user_id = service.authorize_token(login.session_token.as_str())?;
/// assert_eq!(user_id, login.user.id);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct AuthService<S> {
    config: AuthConfig,
    codec: SessionTokenCodec,
    store: S,
}

impl<S> AuthService<S>
where
    S: UserStore + RefreshTokenStore,
{
    /// Create a service from an injected configuration and store.
    pub fn new(config: AuthConfig, store: S) -> Result<Self> {
        let codec = SessionTokenCodec::new(config.token_secret())?;
        Ok(Self {
            config,
            codec,
            store,
        })
    }

    /// Returns the configuration this service was built with.
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Access the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    // ========================================================================
    // Login / Refresh / Revoke
    // ========================================================================

    /// Verify a password and issue a session token plus a refresh token.
    ///
    /// # Errors
    ///
    /// [`AuthError::InvalidCredentials`] for an unknown email or wrong
    /// password; an internal error if any issuance step or the store fails.
    #[instrument(skip(self, credentials), fields(email = %credentials.email()))]
    pub async fn login(&self, credentials: &Credentials) -> Result<LoginOutput> {
        let user = match self.store.find_user_by_email(credentials.email()).await? {
            Some(user) => user,
            None => {
                debug!("No user for email");
                return Err(AuthError::InvalidCredentials.into());
            }
        };

        check_password(&user.password_hash, credentials.password())?;
        debug!(user_id = %user.id, "Password verified");

        let session_token = self.codec.issue(&user.id, self.config.session_ttl())?;

        let refresh_token = generate_refresh_token()?;
        let now = Utc::now();
        let record = RefreshTokenRecord::issue(
            refresh_token.clone(),
            user.id,
            now,
            now + self.config.refresh_ttl(),
        );
        self.store.insert_refresh_token(&record).await?;

        info!(user_id = %user.id, "Login succeeded");

        Ok(LoginOutput {
            user,
            session_token,
            refresh_token,
        })
    }

    /// Mint a new session token from the refresh token in the `Bearer` header.
    ///
    /// The refresh token is not rotated: it stays usable until it expires or
    /// is revoked.
    pub async fn refresh(&self, headers: &HeaderMap) -> Result<SessionToken> {
        let presented = extract_bearer(headers)?;
        self.refresh_token(presented).await
    }

    /// Mint a new session token from a presented refresh token.
    ///
    /// # Errors
    ///
    /// - [`AuthError::UnknownToken`] if the value does not have the issued
    ///   shape or the store has no record of it
    /// - [`AuthError::TokenRevoked`] if the record was revoked
    /// - [`AuthError::TokenExpired`] once the record's expiry has passed
    #[instrument(skip_all)]
    pub async fn refresh_token(&self, presented: &str) -> Result<SessionToken> {
        let token = RefreshToken::parse(presented).map_err(|_| AuthError::UnknownToken)?;

        let record = self
            .store
            .find_refresh_token(&token)
            .await?
            .ok_or(AuthError::UnknownToken)?;

        if record.is_revoked() {
            debug!(user_id = %record.user_id, "Refresh token revoked");
            return Err(AuthError::TokenRevoked.into());
        }

        if record.is_expired_at(Utc::now()) {
            debug!(user_id = %record.user_id, "Refresh token expired");
            return Err(AuthError::TokenExpired.into());
        }

        let session_token = self
            .codec
            .issue(&record.user_id, self.config.session_ttl())?;

        info!(user_id = %record.user_id, "Session refreshed");
        Ok(session_token)
    }

    /// Revoke the refresh token in the `Bearer` header.
    pub async fn revoke(&self, headers: &HeaderMap) -> Result<()> {
        let presented = extract_bearer(headers)?;
        self.revoke_token(presented).await
    }

    /// Revoke a presented refresh token.
    ///
    /// Idempotent. A value that is not shaped like a refresh token cannot
    /// exist in the store, so it is treated like any other unknown token.
    #[instrument(skip_all)]
    pub async fn revoke_token(&self, presented: &str) -> Result<()> {
        let Ok(token) = RefreshToken::parse(presented) else {
            debug!("Revoke of a value that is not a refresh token");
            return Ok(());
        };

        self.store.revoke_refresh_token(&token, Utc::now()).await?;
        info!("Refresh token revoked");
        Ok(())
    }

    // ========================================================================
    // Authorization
    // ========================================================================

    /// Resolve the user behind the session token in the `Bearer` header.
    ///
    /// Ownership checks are left to the caller.
    pub fn authorize(&self, headers: &HeaderMap) -> Result<UserId> {
        let presented = extract_bearer(headers)?;
        self.authorize_token(presented)
    }

    /// Resolve the user behind a session token.
    pub fn authorize_token(&self, token: &str) -> Result<UserId> {
        Ok(self.codec.verify(token)?.subject)
    }

    /// Check the operator key in the `ApiKey` header.
    ///
    /// Keys are compared through their SHA-256 digests, so the comparison
    /// time does not depend on how much of the key matched. With no key
    /// configured every request is rejected.
    pub fn authorize_api_key(&self, headers: &HeaderMap) -> Result<()> {
        let presented = extract_api_key(headers)?;

        let Some(expected) = self.config.api_key() else {
            warn!("API key presented but none is configured");
            return Err(AuthError::InvalidApiKey.into());
        };

        let presented_digest = Sha256::digest(presented.as_bytes());
        let expected_digest = Sha256::digest(expected.as_str().as_bytes());

        if presented_digest != expected_digest {
            debug!("API key mismatch");
            return Err(AuthError::InvalidApiKey.into());
        }

        Ok(())
    }

    // ========================================================================
    // Account Management
    // ========================================================================

    /// Register a new user with a hashed password.
    ///
    /// # Errors
    ///
    /// Returns an invalid-input error for an empty email or one already taken.
    #[instrument(skip(self, credentials), fields(email = %credentials.email()))]
    pub async fn register(&self, credentials: &Credentials) -> Result<UserRecord> {
        validate_email(credentials.email())?;

        let password_hash = hash_password(credentials.password())?;
        let user = self
            .store
            .create_user(credentials.email(), &password_hash)
            .await?;

        info!(user_id = %user.id, "User registered");
        Ok(user)
    }

    /// Replace the email and password of the user behind the `Bearer` session token.
    #[instrument(skip_all, fields(email = %credentials.email()))]
    pub async fn update_credentials(
        &self,
        headers: &HeaderMap,
        credentials: &Credentials,
    ) -> Result<UserRecord> {
        let user_id = self.authorize(headers)?;
        validate_email(credentials.email())?;

        let password_hash = hash_password(credentials.password())?;
        let user = self
            .store
            .update_user_credentials(&user_id, credentials.email(), &password_hash)
            .await?;

        info!(user_id = %user.id, "Credentials updated");
        Ok(user)
    }

    /// Handle a payment provider webhook authenticated by the `ApiKey` header.
    ///
    /// Only [`UPGRADE_EVENT`] changes anything; other events are ignored.
    #[instrument(skip(self, headers))]
    pub async fn handle_payment_event(
        &self,
        headers: &HeaderMap,
        event: &str,
        user_id: &UserId,
    ) -> Result<WebhookOutcome> {
        self.authorize_api_key(headers)?;

        if event != UPGRADE_EVENT {
            debug!("Ignoring payment event");
            return Ok(WebhookOutcome::Ignored);
        }

        self.store.upgrade_user(user_id).await?;
        info!(user_id = %user_id, "User upgraded");
        Ok(WebhookOutcome::Upgraded(*user_id))
    }
}

fn validate_email(email: &str) -> Result<()> {
    if email.trim().is_empty() {
        return Err(InvalidInputError::Email {
            value: email.to_string(),
            reason: "must not be empty".to_string(),
        }
        .into());
    }
    Ok(())
}
