/// Persistence collaborator
///
/// The auth service reads and writes users and refresh tokens only through
/// [`AuthStore`]. Records are re-read on every request; nothing is cached.

mod memory;
mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::auth::RefreshToken;
use crate::error::AppError;

pub use memory::InMemoryAuthStore;
pub use postgres::PgAuthStore;

/// A stored user together with its password hash
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[async_trait]
pub trait AuthStore: Send + Sync + 'static {
    /// Create a user. A duplicate email is `DatabaseError::UniqueConstraintViolation`.
    async fn create_user(&self, email: &str, password_hash: &str) -> Result<UserRecord, AppError>;

    /// Replace a user's email and hash. An unknown id is `DatabaseError::NotFound`.
    async fn update_user(
        &self,
        id: Uuid,
        email: &str,
        password_hash: &str,
    ) -> Result<UserRecord, AppError>;

    async fn find_credential_by_email(&self, email: &str) -> Result<Option<UserRecord>, AppError>;

    async fn insert_refresh_token(
        &self,
        token: &str,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> Result<(), AppError>;

    async fn find_refresh_token(&self, token: &str) -> Result<Option<RefreshToken>, AppError>;

    /// Set `revoked_at` if it is not yet set. Unknown and already revoked
    /// tokens are left untouched and are not an error.
    async fn mark_refresh_token_revoked(&self, token: &str) -> Result<(), AppError>;
}
