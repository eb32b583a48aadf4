/// JWT Token Generation and Validation
///
/// Access tokens are HMAC-signed JWTs. Parsing accepts only the HMAC family,
/// checks the issuer, and reports expiry separately from every other failure.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::auth::claims::{Claims, ISSUER};
use crate::error::AuthError;

/// Lifetime of access tokens minted by login and refresh
pub const ACCESS_TOKEN_TTL_SECONDS: i64 = 3600;

const HMAC_ALGORITHMS: [Algorithm; 3] = [Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];

/// Issue a new access token for a user, valid for `ttl` from now
///
/// # Errors
/// Returns `TokenFailure` if token encoding fails
pub fn issue_access_token(user_id: Uuid, secret: &str, ttl: Duration) -> Result<String, AuthError> {
    issue_access_token_at(user_id, secret, ttl, Utc::now())
}

/// Issue an access token with an explicit issue instant
pub fn issue_access_token_at(
    user_id: Uuid,
    secret: &str,
    ttl: Duration,
    issued_at: DateTime<Utc>,
) -> Result<String, AuthError> {
    let claims = Claims::new(user_id, issued_at, ttl);

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AuthError::TokenFailure(e.to_string()))
}

/// Validate an access token and return the user it was issued to
///
/// # Errors
/// - `TokenExpired` if the token is authentic but past its expiry
/// - `TokenInvalid` for a bad signature, malformed structure, a non-HMAC
///   algorithm, a foreign issuer or a subject that is not a UUID
pub fn parse_access_token(token: &str, secret: &str) -> Result<Uuid, AuthError> {
    parse_access_token_at(token, secret, Utc::now())
}

/// [`parse_access_token`] evaluated at `now`
pub fn parse_access_token_at(
    token: &str,
    secret: &str,
    now: DateTime<Utc>,
) -> Result<Uuid, AuthError> {
    validate_access_token_at(token, secret, now)?.user_id()
}

/// Verify signature and issuer, then check expiry against `now`
///
/// Expiry is checked here rather than by `jsonwebtoken` so that the decision
/// uses the caller's clock with zero leeway, and only after the signature holds.
pub fn validate_access_token_at(
    token: &str,
    secret: &str,
    now: DateTime<Utc>,
) -> Result<Claims, AuthError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.algorithms = HMAC_ALGORITHMS.to_vec();
    validation.validate_exp = false;
    validation.set_required_spec_claims(&["exp", "iss", "sub"]);
    validation.set_issuer(&[ISSUER]);

    let claims = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| {
        tracing::debug!(error = %e, "JWT validation error");
        AuthError::TokenInvalid
    })?;

    if claims.is_expired_at(now) {
        return Err(AuthError::TokenExpired);
    }

    Ok(claims)
}
