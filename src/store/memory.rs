/// In-memory store for tests and database-less local runs

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::auth::RefreshToken;
use crate::error::{AppError, DatabaseError};
use crate::store::{AuthStore, UserRecord};

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, UserRecord>,
    refresh_tokens: HashMap<String, RefreshToken>,
}

#[derive(Default)]
pub struct InMemoryAuthStore {
    tables: Mutex<Tables>,
}

impl InMemoryAuthStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>, AppError> {
        self.tables
            .lock()
            .map_err(|_| DatabaseError::UnexpectedError("store lock poisoned".to_string()).into())
    }
}

fn email_taken(tables: &Tables, email: &str, except: Option<Uuid>) -> bool {
    tables
        .users
        .values()
        .any(|user| user.email == email && Some(user.id) != except)
}

#[async_trait]
impl AuthStore for InMemoryAuthStore {
    async fn create_user(&self, email: &str, password_hash: &str) -> Result<UserRecord, AppError> {
        let mut tables = self.lock()?;
        if email_taken(&tables, email, None) {
            return Err(DatabaseError::UniqueConstraintViolation("users_email_key".to_string()).into());
        }

        let now = Utc::now();
        let user = UserRecord {
            id: Uuid::new_v4(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: now,
            updated_at: now,
        };
        tables.users.insert(user.id, user.clone());

        Ok(user)
    }

    async fn update_user(
        &self,
        id: Uuid,
        email: &str,
        password_hash: &str,
    ) -> Result<UserRecord, AppError> {
        let mut tables = self.lock()?;
        if email_taken(&tables, email, Some(id)) {
            return Err(DatabaseError::UniqueConstraintViolation("users_email_key".to_string()).into());
        }

        let user = tables
            .users
            .get_mut(&id)
            .ok_or_else(|| DatabaseError::NotFound("user".to_string()))?;
        user.email = email.to_string();
        user.password_hash = password_hash.to_string();
        user.updated_at = Utc::now();

        Ok(user.clone())
    }

    async fn find_credential_by_email(&self, email: &str) -> Result<Option<UserRecord>, AppError> {
        let tables = self.lock()?;
        Ok(tables.users.values().find(|user| user.email == email).cloned())
    }

    async fn insert_refresh_token(
        &self,
        token: &str,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> Result<(), AppError> {
        let mut tables = self.lock()?;
        if tables.refresh_tokens.contains_key(token) {
            return Err(
                DatabaseError::UniqueConstraintViolation("refresh_tokens_pkey".to_string()).into(),
            );
        }

        tables.refresh_tokens.insert(
            token.to_string(),
            RefreshToken {
                token: token.to_string(),
                user_id,
                created_at: Utc::now(),
                expires_at,
                revoked_at: None,
            },
        );

        Ok(())
    }

    async fn find_refresh_token(&self, token: &str) -> Result<Option<RefreshToken>, AppError> {
        let tables = self.lock()?;
        Ok(tables.refresh_tokens.get(token).cloned())
    }

    async fn mark_refresh_token_revoked(&self, token: &str) -> Result<(), AppError> {
        let mut tables = self.lock()?;
        if let Some(record) = tables.refresh_tokens.get_mut(token) {
            if record.revoked_at.is_none() {
                record.revoked_at = Some(Utc::now());
            }
        }

        Ok(())
    }
}
