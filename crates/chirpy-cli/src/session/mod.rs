//! Persisted login state for the CLI.

pub mod storage;
mod types;

pub use types::StoredSession;
