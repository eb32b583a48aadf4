/// Authentication module
///
/// Handles password hashing, access token issuing/validation, bearer header
/// parsing and the refresh token lifecycle, and composes them in [`AuthService`].

mod bearer;
mod claims;
mod jwt;
mod password;
mod refresh_token;
mod service;

pub use bearer::{authorization_value, extract_bearer};
pub use claims::{Claims, ISSUER};
pub use jwt::{
    issue_access_token, issue_access_token_at, parse_access_token, parse_access_token_at,
    validate_access_token_at, ACCESS_TOKEN_TTL_SECONDS,
};
pub use password::{hash_password, verify_password};
pub use refresh_token::{
    generate_refresh_token, refresh_token_expiry, RefreshToken, RefreshTokenState,
    REFRESH_TOKEN_TTL_DAYS,
};
pub use service::{AuthService, LoginOutcome, UserProfile};
