/// PostgreSQL store
///
/// Refresh tokens are keyed by their SHA-256 digest; the plaintext value the
/// client holds is never written to the database.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::RefreshToken;
use crate::error::{AppError, DatabaseError};
use crate::store::{AuthStore, UserRecord};

type UserRow = (Uuid, String, String, DateTime<Utc>, DateTime<Utc>);

#[derive(Clone)]
pub struct PgAuthStore {
    pool: PgPool,
}

impl PgAuthStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Lookup key for a refresh token
fn token_digest(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

fn user_from_row(row: UserRow) -> UserRecord {
    let (id, email, password_hash, created_at, updated_at) = row;
    UserRecord {
        id,
        email,
        password_hash,
        created_at,
        updated_at,
    }
}

#[async_trait]
impl AuthStore for PgAuthStore {
    async fn create_user(&self, email: &str, password_hash: &str) -> Result<UserRecord, AppError> {
        let now = Utc::now();

        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (id, email, hashed_password, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $4)
            RETURNING id, email, hashed_password, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(email)
        .bind(password_hash)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(user_from_row(row))
    }

    async fn update_user(
        &self,
        id: Uuid,
        email: &str,
        password_hash: &str,
    ) -> Result<UserRecord, AppError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            UPDATE users
            SET email = $2, hashed_password = $3, updated_at = $4
            WHERE id = $1
            RETURNING id, email, hashed_password, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(email)
        .bind(password_hash)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DatabaseError::NotFound("user".to_string()))?;

        Ok(user_from_row(row))
    }

    async fn find_credential_by_email(&self, email: &str) -> Result<Option<UserRecord>, AppError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, email, hashed_password, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(user_from_row))
    }

    async fn insert_refresh_token(
        &self,
        token: &str,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> Result<(), AppError> {
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO refresh_tokens (token_hash, user_id, created_at, updated_at, expires_at)
            VALUES ($1, $2, $3, $3, $4)
            "#,
        )
        .bind(token_digest(token))
        .bind(user_id)
        .bind(now)
        .bind(expires_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_refresh_token(&self, token: &str) -> Result<Option<RefreshToken>, AppError> {
        let row = sqlx::query_as::<_, (Uuid, DateTime<Utc>, DateTime<Utc>, Option<DateTime<Utc>>)>(
            r#"
            SELECT user_id, created_at, expires_at, revoked_at
            FROM refresh_tokens
            WHERE token_hash = $1
            "#,
        )
        .bind(token_digest(token))
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(user_id, created_at, expires_at, revoked_at)| RefreshToken {
            token: token.to_string(),
            user_id,
            created_at,
            expires_at,
            revoked_at,
        }))
    }

    async fn mark_refresh_token_revoked(&self, token: &str) -> Result<(), AppError> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE refresh_tokens
            SET revoked_at = $1, updated_at = $1
            WHERE token_hash = $2 AND revoked_at IS NULL
            "#,
        )
        .bind(now)
        .bind(token_digest(token))
        .execute(&self.pool)
        .await?;

        tracing::debug!(rows = result.rows_affected(), "Refresh token revocation applied");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::generate_refresh_token;

    #[test]
    fn test_token_digest_is_stable() {
        let token = generate_refresh_token();

        assert_eq!(token_digest(&token), token_digest(&token));
        assert_ne!(token_digest(&token), token);
        assert_eq!(token_digest(&token).len(), 64);
    }

    #[test]
    fn test_different_tokens_different_digests() {
        let token1 = generate_refresh_token();
        let token2 = generate_refresh_token();

        assert_ne!(token_digest(&token1), token_digest(&token2));
    }
}
