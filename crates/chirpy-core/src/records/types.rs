//! User and refresh-token records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::credentials::HashedPassword;
use crate::tokens::RefreshToken;
use crate::types::UserId;

/// A registered user as the store keeps it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    /// The user's identity.
    pub id: UserId,
    /// Login identifier.
    pub email: String,
    /// bcrypt hash of the password.
    pub password_hash: HashedPassword,
    /// When the user registered.
    pub created_at: DateTime<Utc>,
    /// When email or password last changed.
    pub updated_at: DateTime<Utc>,
    /// Premium membership, set by the payment provider's webhook.
    #[serde(default)]
    pub is_chirpy_red: bool,
}

/// A refresh token paired with its owner and lifecycle timestamps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshTokenRecord {
    /// The opaque token value (store key).
    pub token: RefreshToken,
    /// The user the token was issued to.
    pub user_id: UserId,
    /// When the token was issued.
    pub created_at: DateTime<Utc>,
    /// Last mutation (issue or revoke).
    pub updated_at: DateTime<Utc>,
    /// Natural end of the token's life.
    pub expires_at: DateTime<Utc>,
    /// Set once the token is explicitly revoked.
    #[serde(default)]
    pub revoked_at: Option<DateTime<Utc>>,
}

impl RefreshTokenRecord {
    /// Build a fresh, unrevoked record issued at `now`.
    pub fn issue(
        token: RefreshToken,
        user_id: UserId,
        now: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            token,
            user_id,
            created_at: now,
            updated_at: now,
            expires_at,
            revoked_at: None,
        }
    }

    /// Returns true once the token has been revoked.
    pub fn is_revoked(&self) -> bool {
        self.revoked_at.is_some()
    }

    /// Returns true if the token is past its expiry at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn record(expires_in: Duration) -> RefreshTokenRecord {
        let now = Utc::now();
        RefreshTokenRecord::issue(
            RefreshToken::parse("ab".repeat(32)).unwrap(),
            UserId::generate(),
            now,
            now + expires_in,
        )
    }

    #[test]
    fn fresh_record_is_live() {
        let rec = record(Duration::days(60));
        assert!(!rec.is_revoked());
        assert!(!rec.is_expired_at(Utc::now()));
    }

    #[test]
    fn expiry_is_inclusive() {
        let rec = record(Duration::days(1));
        assert!(rec.is_expired_at(rec.expires_at));
        assert!(rec.is_expired_at(rec.expires_at + Duration::seconds(1)));
        assert!(!rec.is_expired_at(rec.expires_at - Duration::seconds(1)));
    }

    #[test]
    fn revoked_at_defaults_to_none_when_absent() {
        let json = serde_json::json!({
            "token": "cd".repeat(32),
            "user_id": "7f1c0e52-52b4-4a37-9d76-0e4f3f5d0b8a",
            "created_at": "2026-01-01T00:00:00Z",
            "updated_at": "2026-01-01T00:00:00Z",
            "expires_at": "2026-03-02T00:00:00Z"
        });
        let rec: RefreshTokenRecord = serde_json::from_value(json).unwrap();
        assert!(!rec.is_revoked());
    }
}
