//! Filesystem storage for users and refresh tokens.
//!
//! ## Directory Structure
//!
//! ```text
//! $ROOT/chirpy/
//! ├── users/
//! │   └── <user-id>/
//! │       └── user.json
//! ├── refresh_tokens/
//! │   └── <token>.json
//! └── store.lock
//! ```
//!
//! Every mutation runs under an exclusive lock on `store.lock`, so a
//! lookup always observes the latest completed write and concurrent
//! revokes of one token are serialized.

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use chirpy_core::error::{Error, InvalidInputError};
use chirpy_core::{HashedPassword, RefreshToken, RefreshTokenRecord, Result, UserId, UserRecord};

fn map_io(err: std::io::Error) -> Error {
    Error::store(format!("IO error: {}", err))
}

fn map_json(err: serde_json::Error) -> Error {
    Error::store(format!("corrupt record: {}", err))
}

/// Filesystem-backed storage for users and refresh tokens.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Create a new file store at the given root directory.
    ///
    /// Directories are created lazily on first write.
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Get the root directory path.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn data_dir(&self) -> PathBuf {
        self.root.join("chirpy")
    }

    fn users_dir(&self) -> PathBuf {
        self.data_dir().join("users")
    }

    fn tokens_dir(&self) -> PathBuf {
        self.data_dir().join("refresh_tokens")
    }

    fn lock_path(&self) -> PathBuf {
        self.data_dir().join("store.lock")
    }

    fn user_path(&self, id: &UserId) -> PathBuf {
        self.users_dir().join(id.to_string()).join("user.json")
    }

    /// Token values are lower-case hex, so they are safe as file names.
    fn token_path(&self, token: &RefreshToken) -> PathBuf {
        self.tokens_dir().join(format!("{}.json", token.as_str()))
    }

    /// Run `f` while holding the exclusive store lock.
    fn with_lock<T>(&self, f: impl FnOnce() -> Result<T>) -> Result<T> {
        fs::create_dir_all(self.data_dir()).map_err(map_io)?;

        let lock_file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(self.lock_path())
            .map_err(map_io)?;

        lock_file.lock_exclusive().map_err(map_io)?;
        let result = f();
        lock_file.unlock().map_err(map_io)?;

        result
    }

    fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(path).map_err(map_io)?;
        let value = serde_json::from_str(&content).map_err(map_json)?;
        Ok(Some(value))
    }

    /// Write via a temp file and rename, so readers never see a partial record.
    fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(map_io)?;
        }

        let content = serde_json::to_string_pretty(value).map_err(map_json)?;
        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, content).map_err(map_io)?;
        fs::rename(&temp_path, path).map_err(map_io)?;

        Ok(())
    }

    // ========================================================================
    // Users
    // ========================================================================

    #[instrument(skip(self, password_hash))]
    pub(crate) fn insert_user(
        &self,
        email: &str,
        password_hash: &HashedPassword,
    ) -> Result<UserRecord> {
        self.with_lock(|| {
            if self.load_user_by_email(email)?.is_some() {
                return Err(InvalidInputError::Email {
                    value: email.to_string(),
                    reason: "already registered".to_string(),
                }
                .into());
            }

            let now = Utc::now();
            let user = UserRecord {
                id: UserId::generate(),
                email: email.to_string(),
                password_hash: password_hash.clone(),
                created_at: now,
                updated_at: now,
                is_chirpy_red: false,
            };

            Self::write_json(&self.user_path(&user.id), &user)?;
            debug!(user_id = %user.id, "Created user");

            Ok(user)
        })
    }

    pub(crate) fn load_user(&self, id: &UserId) -> Result<Option<UserRecord>> {
        Self::read_json(&self.user_path(id))
    }

    pub(crate) fn load_users(&self) -> Result<Vec<UserRecord>> {
        let users_dir = self.users_dir();

        if !users_dir.exists() {
            return Ok(Vec::new());
        }

        let mut users = Vec::new();

        for entry in fs::read_dir(&users_dir).map_err(map_io)? {
            let entry = entry.map_err(map_io)?;
            if let Some(user) = Self::read_json::<UserRecord>(&entry.path().join("user.json"))? {
                users.push(user);
            }
        }

        Ok(users)
    }

    pub(crate) fn load_user_by_email(&self, email: &str) -> Result<Option<UserRecord>> {
        let users = self.load_users()?;
        Ok(users.into_iter().find(|u| u.email == email))
    }

    #[instrument(skip(self, password_hash))]
    pub(crate) fn write_credentials(
        &self,
        id: &UserId,
        email: &str,
        password_hash: &HashedPassword,
    ) -> Result<UserRecord> {
        self.with_lock(|| {
            let mut user = self.load_user(id)?.ok_or_else(|| InvalidInputError::UserNotFound {
                id: id.to_string(),
            })?;

            if let Some(other) = self.load_user_by_email(email)? {
                if other.id != *id {
                    return Err(InvalidInputError::Email {
                        value: email.to_string(),
                        reason: "already registered".to_string(),
                    }
                    .into());
                }
            }

            user.email = email.to_string();
            user.password_hash = password_hash.clone();
            user.updated_at = Utc::now();

            Self::write_json(&self.user_path(id), &user)?;
            debug!(user_id = %id, "Updated user credentials");

            Ok(user)
        })
    }

    #[instrument(skip(self))]
    pub(crate) fn set_chirpy_red(&self, id: &UserId) -> Result<()> {
        self.with_lock(|| {
            let mut user = self.load_user(id)?.ok_or_else(|| InvalidInputError::UserNotFound {
                id: id.to_string(),
            })?;

            user.is_chirpy_red = true;
            user.updated_at = Utc::now();

            Self::write_json(&self.user_path(id), &user)
        })
    }

    // ========================================================================
    // Refresh Tokens
    // ========================================================================

    #[instrument(skip_all, fields(user_id = %record.user_id))]
    pub(crate) fn write_refresh_token(&self, record: &RefreshTokenRecord) -> Result<()> {
        self.with_lock(|| {
            let path = self.token_path(&record.token);
            if path.exists() {
                return Err(Error::store("refresh token already exists"));
            }

            Self::write_json(&path, record)?;
            debug!("Stored refresh token");
            Ok(())
        })
    }

    pub(crate) fn load_refresh_token(
        &self,
        token: &RefreshToken,
    ) -> Result<Option<RefreshTokenRecord>> {
        Self::read_json(&self.token_path(token))
    }

    #[instrument(skip(self, token))]
    pub(crate) fn mark_revoked(&self, token: &RefreshToken, at: DateTime<Utc>) -> Result<()> {
        self.with_lock(|| {
            let path = self.token_path(token);
            let Some(mut record) = Self::read_json::<RefreshTokenRecord>(&path)? else {
                return Ok(());
            };

            if record.revoked_at.is_some() {
                return Ok(());
            }

            record.revoked_at = Some(at);
            record.updated_at = at;
            Self::write_json(&path, &record)?;
            debug!(user_id = %record.user_id, "Marked refresh token revoked");

            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use tempfile::TempDir;

    fn hash() -> HashedPassword {
        HashedPassword::new("$2b$10$abcdefghijklmnopqrstuuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ01")
    }

    fn token(byte: &str) -> RefreshToken {
        RefreshToken::parse(byte.repeat(32)).unwrap()
    }

    #[test]
    fn create_and_find_user() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());

        let user = store.insert_user("alice@example.com", &hash()).unwrap();
        let found = store.load_user_by_email("alice@example.com").unwrap().unwrap();

        assert_eq!(found.id, user.id);
        assert_eq!(found.password_hash, hash());
        assert!(!found.is_chirpy_red);
        assert!(store.load_user_by_email("bob@example.com").unwrap().is_none());
    }

    #[test]
    fn duplicate_email_is_rejected() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());

        store.insert_user("alice@example.com", &hash()).unwrap();
        let err = store.insert_user("alice@example.com", &hash()).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(InvalidInputError::Email { .. })));
    }

    #[test]
    fn update_credentials_replaces_email_and_hash() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());
        let user = store.insert_user("alice@example.com", &hash()).unwrap();

        let new_hash = HashedPassword::new("$2b$10$different");
        let updated = store
            .write_credentials(&user.id, "alice@new.example", &new_hash)
            .unwrap();

        assert_eq!(updated.email, "alice@new.example");
        assert!(store.load_user_by_email("alice@example.com").unwrap().is_none());
        let reloaded = store.load_user(&user.id).unwrap().unwrap();
        assert_eq!(reloaded.password_hash, new_hash);
        assert!(reloaded.updated_at >= user.updated_at);
    }

    #[test]
    fn upgrade_unknown_user_fails() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());
        let err = store.set_chirpy_red(&UserId::generate()).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidInput(InvalidInputError::UserNotFound { .. })
        ));
    }

    #[test]
    fn upgrade_sets_flag() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());
        let user = store.insert_user("alice@example.com", &hash()).unwrap();

        store.set_chirpy_red(&user.id).unwrap();
        assert!(store.load_user(&user.id).unwrap().unwrap().is_chirpy_red);
    }

    #[test]
    fn refresh_token_lifecycle() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());
        let now = Utc::now();
        let record =
            RefreshTokenRecord::issue(token("ab"), UserId::generate(), now, now + Duration::days(60));

        store.write_refresh_token(&record).unwrap();
        let found = store.load_refresh_token(&record.token).unwrap().unwrap();
        assert_eq!(found.user_id, record.user_id);
        assert!(!found.is_revoked());

        store.mark_revoked(&record.token, now).unwrap();
        let revoked = store.load_refresh_token(&record.token).unwrap().unwrap();
        assert_eq!(revoked.revoked_at, Some(now));
    }

    #[test]
    fn revoke_keeps_first_timestamp() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());
        let now = Utc::now();
        let record =
            RefreshTokenRecord::issue(token("cd"), UserId::generate(), now, now + Duration::days(60));
        store.write_refresh_token(&record).unwrap();

        let first = now + Duration::minutes(1);
        store.mark_revoked(&record.token, first).unwrap();
        store
            .mark_revoked(&record.token, first + Duration::minutes(5))
            .unwrap();

        let found = store.load_refresh_token(&record.token).unwrap().unwrap();
        assert_eq!(found.revoked_at, Some(first));
    }

    #[test]
    fn revoke_unknown_token_is_noop() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());
        store.mark_revoked(&token("ef"), Utc::now()).unwrap();
        assert!(store.load_refresh_token(&token("ef")).unwrap().is_none());
    }

    #[test]
    fn duplicate_token_insert_is_rejected() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());
        let now = Utc::now();
        let record =
            RefreshTokenRecord::issue(token("12"), UserId::generate(), now, now + Duration::days(1));

        store.write_refresh_token(&record).unwrap();
        assert!(store.write_refresh_token(&record).unwrap_err().is_internal());
    }

    #[test]
    fn corrupt_record_is_a_store_error() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());
        let path = store.token_path(&token("34"));
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "{not json").unwrap();

        let err = store.load_refresh_token(&token("34")).unwrap_err();
        assert!(err.is_internal());
    }
}
