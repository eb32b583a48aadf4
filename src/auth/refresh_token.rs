/// Refresh Token Lifecycle
///
/// Refresh tokens are:
/// - 32 bytes from the OS random source, hex encoded (64 characters)
/// - Valid for 60 days from creation
/// - Revocable exactly once; revocation is never undone
/// - Never rotated on use
///
/// Expiry is never written anywhere. It is computed from `expires_at` every
/// time a record is read.

use chrono::{DateTime, Duration, Utc};
use rand::rngs::OsRng;
use rand::RngCore;
use uuid::Uuid;

/// Lifetime of a refresh token from the moment it is created
pub const REFRESH_TOKEN_TTL_DAYS: i64 = 60;

const REFRESH_TOKEN_BYTES: usize = 32;

/// Generate a new cryptographically secure refresh token
///
/// Uniqueness is probabilistic; the store's unique key on the token is the backstop.
pub fn generate_refresh_token() -> String {
    let mut bytes = [0u8; REFRESH_TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Expiry instant for a refresh token created at `created_at`
pub fn refresh_token_expiry(created_at: DateTime<Utc>) -> DateTime<Utc> {
    created_at + Duration::days(REFRESH_TOKEN_TTL_DAYS)
}

/// State of a refresh token at a given instant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshTokenState {
    Active,
    Revoked,
    Expired,
}

/// A stored refresh token as read back from the store
#[derive(Debug, Clone)]
pub struct RefreshToken {
    pub token: String,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub revoked_at: Option<DateTime<Utc>>,
}

impl RefreshToken {
    /// Revocation wins over expiry when both apply
    pub fn state_at(&self, now: DateTime<Utc>) -> RefreshTokenState {
        if self.revoked_at.is_some() {
            RefreshTokenState::Revoked
        } else if now >= self.expires_at {
            RefreshTokenState::Expired
        } else {
            RefreshTokenState::Active
        }
    }

    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        self.state_at(now) == RefreshTokenState::Active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(created_at: DateTime<Utc>) -> RefreshToken {
        RefreshToken {
            token: generate_refresh_token(),
            user_id: Uuid::new_v4(),
            created_at,
            expires_at: refresh_token_expiry(created_at),
            revoked_at: None,
        }
    }

    #[test]
    fn test_generate_refresh_token() {
        let token = generate_refresh_token();

        assert_eq!(token.len(), 64);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_tokens_are_unique() {
        let token1 = generate_refresh_token();
        let token2 = generate_refresh_token();

        assert_ne!(token1, token2);
    }

    #[test]
    fn test_expiry_is_sixty_days() {
        let created_at = Utc::now();
        assert_eq!(
            refresh_token_expiry(created_at) - created_at,
            Duration::days(60)
        );
    }

    #[test]
    fn test_fresh_token_is_active() {
        let now = Utc::now();
        let token = record(now);

        assert_eq!(token.state_at(now), RefreshTokenState::Active);
        assert!(token.is_active_at(now + Duration::days(59)));
    }

    #[test]
    fn test_token_expires_at_boundary() {
        let now = Utc::now();
        let token = record(now);

        assert_eq!(token.state_at(token.expires_at), RefreshTokenState::Expired);
        assert!(!token.is_active_at(now + Duration::days(61)));
    }

    #[test]
    fn test_revoked_takes_precedence() {
        let now = Utc::now();
        let mut token = record(now);
        token.revoked_at = Some(now);

        assert_eq!(token.state_at(now), RefreshTokenState::Revoked);
        assert_eq!(
            token.state_at(now + Duration::days(90)),
            RefreshTokenState::Revoked
        );
    }
}
