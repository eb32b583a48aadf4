/// Bearer credential extraction from the `Authorization` header

use actix_web::http::header::{HeaderMap, AUTHORIZATION};

use crate::error::AuthError;

const BEARER_SCHEME: &str = "bearer";

/// Read the raw `Authorization` value
///
/// A value that is not visible ASCII is present, so it is `HeaderMalformed`
/// rather than missing.
pub fn authorization_value(headers: &HeaderMap) -> Result<Option<&str>, AuthError> {
    headers
        .get(AUTHORIZATION)
        .map(|value| value.to_str().map_err(|_| AuthError::HeaderMalformed))
        .transpose()
}

/// Parse `Bearer <token>` and return the token
///
/// The value must split on a single space into exactly two fields: the scheme,
/// matched case-insensitively, and a non-empty token.
///
/// # Errors
/// - `HeaderMissing` if the header is absent or empty
/// - `HeaderMalformed` for any other shape
pub fn extract_bearer(header: Option<&str>) -> Result<String, AuthError> {
    let value = match header {
        Some(value) if !value.is_empty() => value,
        _ => return Err(AuthError::HeaderMissing),
    };

    let fields: Vec<&str> = value.split(' ').collect();
    match fields.as_slice() {
        [scheme, token] if scheme.eq_ignore_ascii_case(BEARER_SCHEME) && !token.is_empty() => {
            Ok((*token).to_string())
        }
        _ => Err(AuthError::HeaderMalformed),
    }
}
