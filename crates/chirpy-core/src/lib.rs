//! chirpy-core - Core types and traits for the chirpy auth subsystem.

pub mod credentials;
pub mod error;
pub mod records;
pub mod tokens;
pub mod traits;
pub mod types;

pub use credentials::{Credentials, HashedPassword};
pub use error::{AuthError, Error, ErrorKind, HeaderError, InternalError, InvalidInputError};
pub use records::{RefreshTokenRecord, UserRecord};
pub use tokens::{ApiKey, REFRESH_TOKEN_BYTES, REFRESH_TOKEN_LEN, RefreshToken, SessionToken};
pub use traits::{RefreshTokenStore, UserStore};
pub use types::UserId;

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
