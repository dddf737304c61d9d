//! chirpy-auth - Credential and session-token subsystem for chirpy.
//!
//! This crate provides the security-relevant core of the service:
//!
//! - password hashing and verification ([`hash_password`], [`check_password`])
//! - signed session tokens ([`issue_session_token`], [`verify_session_token`])
//! - opaque refresh tokens ([`generate_refresh_token`])
//! - `Authorization` header parsing ([`extract_bearer`], [`extract_api_key`])
//! - the composed flows over a store ([`AuthService`])
//!
//! Everything except [`AuthService`]'s store calls is synchronous and free
//! of shared state.
//!
//! # Example
//!
//! ```
//! use chirpy_auth::{issue_session_token, verify_session_token};
//! use chirpy_core::UserId;
//! use chrono::Duration;
//!
//! let user = UserId::generate();
//! let token = issue_session_token(&user, b"supersecret", Duration::hours(1)).unwrap();
//! assert_eq!(verify_session_token(token.as_str(), b"supersecret").unwrap(), user);
//! assert!(verify_session_token(token.as_str(), b"wrongsecret").is_err());
//! ```

pub mod config;
pub mod extract;
pub mod password;
pub mod refresh_token;
pub mod service;
pub mod session_token;

pub use config::AuthConfig;
pub use extract::{Scheme, extract_api_key, extract_bearer, parse_authorization};
pub use password::{PASSWORD_COST, check_password, hash_password};
pub use refresh_token::generate_refresh_token;
pub use service::{AuthService, LoginOutput, UPGRADE_EVENT, WebhookOutcome};
pub use session_token::{
    SessionClaims, SessionTokenCodec, TOKEN_ISSUER, VerifiedSession, issue_session_token,
    verify_session_token,
};
