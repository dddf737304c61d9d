//! Stored session shape.

use std::fmt;

use serde::{Deserialize, Serialize};

use chirpy_core::{RefreshToken, UserId};

/// Tokens from the last successful login.
#[derive(Clone, Serialize, Deserialize)]
pub struct StoredSession {
    pub user_id: UserId,
    pub email: String,
    pub session_token: String,
    pub refresh_token: RefreshToken,
}

impl fmt::Debug for StoredSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoredSession")
            .field("user_id", &self.user_id)
            .field("email", &self.email)
            .field("session_token", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .finish()
    }
}
