//! chirpy-file - Filesystem-backed user and refresh-token store.
//!
//! [`FileStore`] keeps one JSON document per user and per refresh token
//! under a root directory and implements the store traits from
//! `chirpy-core`.

mod backend;
mod store;

pub use store::FileStore;
