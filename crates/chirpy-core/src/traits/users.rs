//! User store trait.

use async_trait::async_trait;

use crate::credentials::HashedPassword;
use crate::records::UserRecord;
use crate::types::UserId;
use crate::Result;

/// Persistence for registered users.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Create a user. Fails with an invalid-input error if the email is taken.
    async fn create_user(&self, email: &str, password_hash: &HashedPassword)
    -> Result<UserRecord>;

    /// Fetch a user, with its password hash, by login identifier.
    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>>;

    /// Fetch a user by id.
    async fn get_user(&self, id: &UserId) -> Result<Option<UserRecord>>;

    /// Replace a user's email and password hash.
    async fn update_user_credentials(
        &self,
        id: &UserId,
        email: &str,
        password_hash: &HashedPassword,
    ) -> Result<UserRecord>;

    /// Mark a user as a premium member. Fails if the user does not exist.
    async fn upgrade_user(&self, id: &UserId) -> Result<()>;
}
