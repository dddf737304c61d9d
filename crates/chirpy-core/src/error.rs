//! Error types for chirpy.
//!
//! This module provides a unified error type with explicit variants for
//! authentication, header parsing, input validation and internal failures.
//! No variant ever carries secret, token or hash material.

use std::fmt;
use thiserror::Error;

/// The unified error type for chirpy operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Authentication errors (bad password, bad or dead token).
    #[error("authentication error: {0}")]
    Auth(#[from] AuthError),

    /// The `Authorization` header was missing or malformed.
    #[error("malformed authorization header: {0}")]
    Header(#[from] HeaderError),

    /// Input validation errors (bad user id, bad refresh token shape).
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInputError),

    /// Failures of the primitives or the store. Never retried internally.
    #[error("internal error: {0}")]
    Internal(#[from] InternalError),
}

/// Authentication-related errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// Unknown login or wrong password.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Session token is empty or not a structurally valid token.
    #[error("session token malformed")]
    TokenMalformed,

    /// Session token signature does not match its contents.
    #[error("session token signature mismatch")]
    TokenTampered,

    /// Session or refresh token is past its expiry.
    #[error("token expired")]
    TokenExpired,

    /// Refresh token was explicitly revoked.
    #[error("refresh token revoked")]
    TokenRevoked,

    /// Refresh token is not known to the store.
    #[error("unknown refresh token")]
    UnknownToken,

    /// Session token subject is not a valid user id, or its issuer is foreign.
    #[error("session token subject invalid")]
    InvalidSubject,

    /// Presented API key does not match the configured operator key.
    #[error("invalid API key")]
    InvalidApiKey,
}

/// Authorization header parsing errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HeaderError {
    /// No `Authorization` header, or an empty one.
    #[error("authorization header missing")]
    Missing,

    /// Header does not start with the expected scheme and separator.
    #[error("expected '{expected}' scheme")]
    WrongScheme { expected: &'static str },

    /// Header carries the scheme but no credential after it.
    #[error("'{scheme}' credential truncated")]
    Truncated { scheme: &'static str },

    /// Header value is not visible ASCII.
    #[error("authorization header is not valid ASCII")]
    InvalidEncoding,
}

/// Internal failures. The caller decides on a generic failure response.
#[derive(Debug, Error)]
pub enum InternalError {
    /// The password hashing primitive failed.
    #[error("password hashing failed: {message}")]
    Hashing { message: String },

    /// The session token could not be signed.
    #[error("token signing failed: {message}")]
    Signing { message: String },

    /// The secure random source could not provide enough bytes.
    #[error("random source failed: {message}")]
    Randomness { message: String },

    /// The backing store was unavailable or returned corrupt data.
    #[error("store error: {message}")]
    Store { message: String },

    /// The subsystem was configured with unusable values.
    #[error("configuration error: {message}")]
    Config { message: String },
}

/// Input validation errors.
#[derive(Debug, Error)]
pub enum InvalidInputError {
    /// Invalid user id format.
    #[error("invalid user id '{value}': {reason}")]
    UserId { value: String, reason: String },

    /// Refresh token does not have the issued shape. The value is not echoed.
    #[error("invalid refresh token: {reason}")]
    RefreshToken { reason: String },

    /// Invalid or already registered email.
    #[error("invalid email '{value}': {reason}")]
    Email { value: String, reason: String },

    /// No user with the given id.
    #[error("user {id} not found")]
    UserNotFound { id: String },

    /// Generic invalid input.
    #[error("invalid input: {message}")]
    Other { message: String },
}

/// The closed failure taxonomy the request handler layer maps onto responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidCredentials,
    MalformedHeader,
    TokenMalformed,
    TokenTampered,
    TokenExpired,
    TokenRevoked,
    UnknownToken,
    InvalidInput,
    InternalError,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::InvalidCredentials => "InvalidCredentials",
            ErrorKind::MalformedHeader => "MalformedHeader",
            ErrorKind::TokenMalformed => "TokenMalformed",
            ErrorKind::TokenTampered => "TokenTampered",
            ErrorKind::TokenExpired => "TokenExpired",
            ErrorKind::TokenRevoked => "TokenRevoked",
            ErrorKind::UnknownToken => "UnknownToken",
            ErrorKind::InvalidInput => "InvalidInput",
            ErrorKind::InternalError => "InternalError",
        };
        f.write_str(name)
    }
}

impl Error {
    /// Collapse this error onto the boundary taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Auth(err) => match err {
                AuthError::InvalidCredentials | AuthError::InvalidApiKey => {
                    ErrorKind::InvalidCredentials
                }
                AuthError::TokenMalformed => ErrorKind::TokenMalformed,
                // A well-signed token naming something that is not a user
                // is treated like a forged one.
                AuthError::TokenTampered | AuthError::InvalidSubject => ErrorKind::TokenTampered,
                AuthError::TokenExpired => ErrorKind::TokenExpired,
                AuthError::TokenRevoked => ErrorKind::TokenRevoked,
                AuthError::UnknownToken => ErrorKind::UnknownToken,
            },
            Error::Header(_) => ErrorKind::MalformedHeader,
            Error::InvalidInput(_) => ErrorKind::InvalidInput,
            Error::Internal(_) => ErrorKind::InternalError,
        }
    }

    /// Returns true if the client should receive an "unauthorized" rejection.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Error::Auth(_) | Error::Header(_))
    }

    /// Returns true for failures of the subsystem itself rather than the caller's input.
    pub fn is_internal(&self) -> bool {
        matches!(self, Error::Internal(_))
    }

    /// Shorthand for a store failure.
    pub fn store(message: impl Into<String>) -> Self {
        Error::Internal(InternalError::Store {
            message: message.into(),
        })
    }
}
