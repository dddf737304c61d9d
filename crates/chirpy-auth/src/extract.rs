//! Credential extraction from `Authorization` headers.
//!
//! Two conventions are recognized, both bit-exact and case-sensitive:
//!
//! ```text
//! Authorization: Bearer <token>
//! Authorization: ApiKey <key>
//! ```
//!
//! The extracted value is everything after the scheme and its single
//! separating space. It is never trimmed and must not be empty.

use http::HeaderMap;
use http::header::AUTHORIZATION;

use chirpy_core::error::HeaderError;
use chirpy_core::Result;

/// An authorization scheme literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    /// `Bearer`: a session token or a refresh token, depending on the endpoint.
    Bearer,
    /// `ApiKey`: the static operator key.
    ApiKey,
}

impl Scheme {
    /// The literal that must open the header value.
    pub fn literal(self) -> &'static str {
        match self {
            Scheme::Bearer => "Bearer",
            Scheme::ApiKey => "ApiKey",
        }
    }
}

const SEPARATOR: char = ' ';

/// Extract the token from an `Authorization: Bearer <token>` header.
pub fn extract_bearer(headers: &HeaderMap) -> Result<&str> {
    extract(headers, Scheme::Bearer)
}

/// Extract the key from an `Authorization: ApiKey <key>` header.
pub fn extract_api_key(headers: &HeaderMap) -> Result<&str> {
    extract(headers, Scheme::ApiKey)
}

/// Extract the credential for `scheme` from the `Authorization` header.
pub fn extract(headers: &HeaderMap, scheme: Scheme) -> Result<&str> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or(HeaderError::Missing)?
        .to_str()
        .map_err(|_| HeaderError::InvalidEncoding)?;

    Ok(parse_authorization(value, scheme)?)
}

/// Parse a raw `Authorization` header value for `scheme`.
///
/// Every check happens before any slicing, so short or hostile input is a
/// typed error rather than an out-of-range access.
pub fn parse_authorization(value: &str, scheme: Scheme) -> std::result::Result<&str, HeaderError> {
    let literal = scheme.literal();

    if value.is_empty() {
        return Err(HeaderError::Missing);
    }

    let Some(rest) = value.strip_prefix(literal) else {
        return Err(HeaderError::WrongScheme { expected: literal });
    };

    if rest.is_empty() {
        return Err(HeaderError::Truncated { scheme: literal });
    }

    // "BearerXYZ" names some other scheme, not a truncated Bearer.
    let Some(credential) = rest.strip_prefix(SEPARATOR) else {
        return Err(HeaderError::WrongScheme { expected: literal });
    };

    if credential.is_empty() {
        return Err(HeaderError::Truncated { scheme: literal });
    }

    Ok(credential)
}
