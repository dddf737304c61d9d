//! Persisted record types.
//!
//! These are the shapes the store traits exchange with the auth subsystem.
//! Their lifetime is owned by the store, not by the code reading them.

mod types;

pub use types::{RefreshTokenRecord, UserRecord};
