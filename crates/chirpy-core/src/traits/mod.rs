//! Store traits the auth subsystem consumes.
//!
//! The subsystem never locks on its own; implementations must give
//! read-after-write consistency per key and serialize concurrent
//! mutations of the same refresh token.

mod refresh_tokens;
mod users;

pub use refresh_tokens::RefreshTokenStore;
pub use users::UserStore;
