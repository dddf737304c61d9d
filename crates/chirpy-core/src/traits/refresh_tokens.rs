//! Refresh token store trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::records::RefreshTokenRecord;
use crate::tokens::RefreshToken;
use crate::Result;

/// Persistence for refresh-token records, keyed by token value.
#[async_trait]
pub trait RefreshTokenStore: Send + Sync {
    /// Insert a freshly issued record.
    async fn insert_refresh_token(&self, record: &RefreshTokenRecord) -> Result<()>;

    /// Fetch a record with its owner, expiry and revocation state.
    async fn find_refresh_token(&self, token: &RefreshToken) -> Result<Option<RefreshTokenRecord>>;

    /// Set `revoked_at` on a record.
    ///
    /// Idempotent: revoking an already revoked token keeps the first
    /// timestamp, and revoking an unknown token is a no-op.
    async fn revoke_refresh_token(&self, token: &RefreshToken, at: DateTime<Utc>) -> Result<()>;
}
