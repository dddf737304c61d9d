//! Core identity types.
//!
//! These types enforce their invariants at construction time,
//! so an invalid identity never reaches token or store code.

mod user_id;

pub use user_id::UserId;
