//! User identifier type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::{Error, InvalidInputError};

/// The opaque identity a session token, refresh token or password hash is bound to.
///
/// Serialized, displayed and carried in token `sub` claims as the
/// hyphenated lower-case UUID string.
///
/// # Example
///
/// ```
/// use chirpy_core::UserId;
///
/// let id = UserId::parse("7f1c0e52-52b4-4a37-9d76-0e4f3f5d0b8a").unwrap();
/// assert_eq!(id.to_string(), "7f1c0e52-52b4-4a37-9d76-0e4f3f5d0b8a");
/// assert!(UserId::parse("not-a-user").is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(Uuid);

impl UserId {
    /// Generate a fresh random user id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a user id from its string form.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a UUID, or is the nil UUID.
    pub fn parse(s: impl AsRef<str>) -> Result<Self, Error> {
        let s = s.as_ref();
        let uuid = Uuid::parse_str(s).map_err(|e| InvalidInputError::UserId {
            value: s.to_string(),
            reason: e.to_string(),
        })?;

        if uuid.is_nil() {
            return Err(InvalidInputError::UserId {
                value: s.to_string(),
                reason: "nil UUID is not a user".to_string(),
            }
            .into());
        }

        Ok(Self(uuid))
    }

    /// Returns the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for UserId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl FromStr for UserId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for UserId {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<UserId> for String {
    fn from(id: UserId) -> Self {
        id.to_string()
    }
}
