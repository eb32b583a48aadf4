/// Authentication Orchestrator
///
/// Composes the password hasher, the token codec, the bearer extractor and
/// the refresh token lifecycle into the user-facing flows. Every flow is
/// all-or-nothing: on any error no token is handed out.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::auth::bearer::extract_bearer;
use crate::auth::jwt::{issue_access_token, parse_access_token, ACCESS_TOKEN_TTL_SECONDS};
use crate::auth::password::{hash_password, verify_password};
use crate::auth::refresh_token::{generate_refresh_token, refresh_token_expiry, RefreshTokenState};
use crate::configuration::AuthSettings;
use crate::error::{
    AppError, AuthError, ConfigError, DatabaseError, ErrorContext, ValidationError,
};
use crate::store::{AuthStore, UserRecord};
use crate::validators::{is_valid_email, is_valid_password};

/// Public view of a user; never carries the password hash
#[derive(Debug, Clone)]
pub struct UserProfile {
    pub id: Uuid,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserRecord> for UserProfile {
    fn from(record: UserRecord) -> Self {
        Self {
            id: record.id,
            email: record.email,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

/// Result of a successful login
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub user: UserProfile,
    pub access_token: String,
    pub refresh_token: String,
}

pub struct AuthService {
    store: Arc<dyn AuthStore>,
    secret: String,
}

impl AuthService {
    /// # Errors
    /// Returns `ConfigError::MissingRequired` if the signing secret is empty
    pub fn new(store: Arc<dyn AuthStore>, settings: &AuthSettings) -> Result<Self, AppError> {
        if settings.secret.is_empty() {
            return Err(ConfigError::MissingRequired("auth.secret".to_string()).into());
        }

        Ok(Self {
            store,
            secret: settings.secret.clone(),
        })
    }

    pub fn access_token_ttl() -> Duration {
        Duration::seconds(ACCESS_TOKEN_TTL_SECONDS)
    }

    /// Create a user from an email and a plaintext password
    ///
    /// # Errors
    /// - `Validation` for a malformed email or a missing/oversized password
    /// - `Database(UniqueConstraintViolation)` if the email is taken
    pub async fn register(&self, email: &str, password: &str) -> Result<UserProfile, AppError> {
        let context = ErrorContext::new("user_registration");

        let email = is_valid_email(email)?;
        is_valid_password(password)?;
        let password_hash = hash_password(password)?;

        let user = self.store.create_user(&email, &password_hash).await?;

        tracing::info!(
            request_id = %context.request_id,
            operation = %context.operation,
            user_id = %user.id,
            "User registered successfully"
        );

        Ok(user.into())
    }

    /// Replace the email and password of an authenticated user
    pub async fn update_credentials(
        &self,
        user_id: Uuid,
        email: &str,
        password: &str,
    ) -> Result<UserProfile, AppError> {
        let context = ErrorContext::new("user_update");

        let email = is_valid_email(email)?;
        is_valid_password(password)?;
        let password_hash = hash_password(password)?;

        let user = self.store.update_user(user_id, &email, &password_hash).await?;

        tracing::info!(
            request_id = %context.request_id,
            operation = %context.operation,
            user_id = %user.id,
            "User credentials updated"
        );

        Ok(user.into())
    }

    /// Check credentials and hand out an access token and a new refresh token
    ///
    /// An unknown email and a wrong password both yield `InvalidCredentials`,
    /// so the response does not reveal whether an account exists.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome, AppError> {
        let context = ErrorContext::new("user_login");

        let email = email.trim();
        if email.is_empty() {
            return Err(ValidationError::EmptyField("email".to_string()).into());
        }

        let user = self
            .store
            .find_credential_by_email(email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        match verify_password(password, &user.password_hash) {
            Ok(true) => {}
            Ok(false) => return Err(AuthError::InvalidCredentials.into()),
            Err(e) => {
                tracing::error!(
                    request_id = %context.request_id,
                    user_id = %user.id,
                    error = %e,
                    "Stored password hash could not be verified"
                );
                return Err(AuthError::InvalidCredentials.into());
            }
        }

        let access_token = issue_access_token(user.id, &self.secret, Self::access_token_ttl())?;
        let refresh_token = generate_refresh_token();
        self.store
            .insert_refresh_token(&refresh_token, user.id, refresh_token_expiry(Utc::now()))
            .await
            .map_err(|e| match e {
                AppError::Database(DatabaseError::UniqueConstraintViolation(constraint)) => {
                    AppError::Internal(format!("refresh token collision on {}", constraint))
                }
                other => other,
            })?;

        tracing::info!(
            request_id = %context.request_id,
            operation = %context.operation,
            user_id = %user.id,
            "User logged in successfully"
        );

        Ok(LoginOutcome {
            user: user.into(),
            access_token,
            refresh_token,
        })
    }

    /// Exchange an active refresh token for a new access token
    ///
    /// The refresh token itself is not rotated. Unknown, revoked and expired
    /// tokens are indistinguishable to the caller.
    pub async fn refresh(&self, authorization: Option<&str>) -> Result<String, AppError> {
        let context = ErrorContext::new("token_refresh");

        let token = extract_bearer(authorization)?;
        let record = match self.store.find_refresh_token(&token).await? {
            Some(record) => record,
            None => {
                tracing::warn!(request_id = %context.request_id, "Refresh token not found");
                return Err(AuthError::Unauthorized.into());
            }
        };

        match record.state_at(Utc::now()) {
            RefreshTokenState::Active => {}
            RefreshTokenState::Revoked => {
                tracing::warn!(
                    request_id = %context.request_id,
                    user_id = %record.user_id,
                    "Attempt to use revoked refresh token"
                );
                return Err(AuthError::Unauthorized.into());
            }
            RefreshTokenState::Expired => {
                tracing::info!(
                    request_id = %context.request_id,
                    user_id = %record.user_id,
                    "Refresh token expired"
                );
                return Err(AuthError::Unauthorized.into());
            }
        }

        let access_token =
            issue_access_token(record.user_id, &self.secret, Self::access_token_ttl())?;

        tracing::info!(
            request_id = %context.request_id,
            user_id = %record.user_id,
            "Access token refreshed"
        );

        Ok(access_token)
    }

    /// Revoke a refresh token; revoking twice or revoking an unknown token succeeds
    pub async fn revoke(&self, authorization: Option<&str>) -> Result<(), AppError> {
        let context = ErrorContext::new("token_revoke");

        let token = extract_bearer(authorization)?;
        self.store.mark_refresh_token_revoked(&token).await?;

        tracing::info!(request_id = %context.request_id, "Refresh token revoked");
        Ok(())
    }

    /// Resolve the user behind a bearer access token
    ///
    /// Header problems are reported as `Unauthorized`; token problems keep
    /// their kind so callers can tell an expired session apart.
    pub fn authenticate(&self, authorization: Option<&str>) -> Result<Uuid, AppError> {
        let token = extract_bearer(authorization).map_err(|_| AuthError::Unauthorized)?;
        Ok(parse_access_token(&token, &self.secret)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::RefreshToken;
    use crate::store::InMemoryAuthStore;
    use async_trait::async_trait;

    /// Delegates to the in-memory store but rejects every refresh token insert
    /// as a duplicate key.
    struct CollidingStore {
        inner: InMemoryAuthStore,
    }

    #[async_trait]
    impl AuthStore for CollidingStore {
        async fn create_user(&self, email: &str, password_hash: &str) -> Result<UserRecord, AppError> {
            self.inner.create_user(email, password_hash).await
        }

        async fn update_user(
            &self,
            id: Uuid,
            email: &str,
            password_hash: &str,
        ) -> Result<UserRecord, AppError> {
            self.inner.update_user(id, email, password_hash).await
        }

        async fn find_credential_by_email(
            &self,
            email: &str,
        ) -> Result<Option<UserRecord>, AppError> {
            self.inner.find_credential_by_email(email).await
        }

        async fn insert_refresh_token(
            &self,
            _token: &str,
            _user_id: Uuid,
            _expires_at: DateTime<Utc>,
        ) -> Result<(), AppError> {
            Err(DatabaseError::UniqueConstraintViolation("refresh_tokens_pkey".to_string()).into())
        }

        async fn find_refresh_token(&self, token: &str) -> Result<Option<RefreshToken>, AppError> {
            self.inner.find_refresh_token(token).await
        }

        async fn mark_refresh_token_revoked(&self, token: &str) -> Result<(), AppError> {
            self.inner.mark_refresh_token_revoked(token).await
        }
    }

    fn service() -> AuthService {
        let settings = AuthSettings {
            secret: "test-secret-key-at-least-32-characters-long".to_string(),
        };
        AuthService::new(Arc::new(InMemoryAuthStore::new()), &settings).unwrap()
    }

    #[test]
    fn test_empty_secret_is_rejected() {
        let settings = AuthSettings {
            secret: String::new(),
        };
        let result = AuthService::new(Arc::new(InMemoryAuthStore::new()), &settings);

        assert!(matches!(
            result,
            Err(AppError::Config(ConfigError::MissingRequired(_)))
        ));
    }

    #[tokio::test]
    async fn test_login_requires_email() {
        let result = service().login("   ", "password").await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_access_token_round_trips_through_authenticate() {
        let service = service();
        let user = service.register("a@example.com", "hunter2").await.unwrap();
        let outcome = service.login("a@example.com", "hunter2").await.unwrap();

        let header = format!("Bearer {}", outcome.access_token);
        assert_eq!(service.authenticate(Some(&header)).unwrap(), user.id);
    }

    #[tokio::test]
    async fn test_authenticate_maps_header_errors_to_unauthorized() {
        let service = service();

        for header in [None, Some(""), Some("Basic abc"), Some("Bearer")] {
            assert!(matches!(
                service.authenticate(header),
                Err(AppError::Auth(AuthError::Unauthorized))
            ));
        }
    }

    #[tokio::test]
    async fn test_refresh_token_is_not_accepted_as_access_token() {
        let service = service();
        service.register("a@example.com", "hunter2").await.unwrap();
        let outcome = service.login("a@example.com", "hunter2").await.unwrap();

        let header = format!("Bearer {}", outcome.refresh_token);
        assert!(matches!(
            service.authenticate(Some(&header)),
            Err(AppError::Auth(AuthError::TokenInvalid))
        ));
    }

    #[tokio::test]
    async fn test_refresh_token_collision_is_internal_error() {
        let settings = AuthSettings {
            secret: "test-secret-key-at-least-32-characters-long".to_string(),
        };
        let store = Arc::new(CollidingStore {
            inner: InMemoryAuthStore::new(),
        });
        let service = AuthService::new(store, &settings).unwrap();
        service.register("a@example.com", "hunter2").await.unwrap();

        let result = service.login("a@example.com", "hunter2").await;

        assert!(matches!(result, Err(AppError::Internal(_))));
    }
}
