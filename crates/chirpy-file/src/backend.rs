//! Store trait implementations for [`FileStore`].
//!
//! The file operations are blocking but short; they run inline on the
//! calling task.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use chirpy_core::traits::{RefreshTokenStore, UserStore};
use chirpy_core::{HashedPassword, RefreshToken, RefreshTokenRecord, Result, UserId, UserRecord};

use crate::store::FileStore;

#[async_trait]
impl UserStore for FileStore {
    async fn create_user(
        &self,
        email: &str,
        password_hash: &HashedPassword,
    ) -> Result<UserRecord> {
        self.insert_user(email, password_hash)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>> {
        self.load_user_by_email(email)
    }

    async fn get_user(&self, id: &UserId) -> Result<Option<UserRecord>> {
        self.load_user(id)
    }

    async fn update_user_credentials(
        &self,
        id: &UserId,
        email: &str,
        password_hash: &HashedPassword,
    ) -> Result<UserRecord> {
        self.write_credentials(id, email, password_hash)
    }

    async fn upgrade_user(&self, id: &UserId) -> Result<()> {
        self.set_chirpy_red(id)
    }
}

#[async_trait]
impl RefreshTokenStore for FileStore {
    async fn insert_refresh_token(&self, record: &RefreshTokenRecord) -> Result<()> {
        self.write_refresh_token(record)
    }

    async fn find_refresh_token(&self, token: &RefreshToken) -> Result<Option<RefreshTokenRecord>> {
        self.load_refresh_token(token)
    }

    async fn revoke_refresh_token(&self, token: &RefreshToken, at: DateTime<Utc>) -> Result<()> {
        self.mark_revoked(token, at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use tempfile::TempDir;

    #[tokio::test]
    async fn store_traits_share_one_tree() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());

        let user = UserStore::create_user(&store, "carol@example.com", &HashedPassword::new("h"))
            .await
            .unwrap();
        let by_id = UserStore::get_user(&store, &user.id).await.unwrap().unwrap();
        assert_eq!(by_id.email, "carol@example.com");

        let now = Utc::now();
        let token = RefreshToken::parse("0f".repeat(32)).unwrap();
        let record = RefreshTokenRecord::issue(token.clone(), user.id, now, now + Duration::days(60));
        RefreshTokenStore::insert_refresh_token(&store, &record).await.unwrap();

        let reopened = FileStore::new(dir.path());
        let found = RefreshTokenStore::find_refresh_token(&reopened, &token)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.user_id, user.id);
    }
}
