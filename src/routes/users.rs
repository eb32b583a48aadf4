/// User Routes
///
/// Registration and credential update. Updating requires a valid access token.

use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::auth::{AuthService, UserProfile};
use crate::error::AppError;
use crate::middleware::AuthenticatedUser;

/// Create or update user request
#[derive(Deserialize)]
pub struct UserCredentialsRequest {
    pub email: String,
    pub password: String,
}

/// User information response
#[derive(Serialize)]
pub struct UserResponse {
    pub id: String,
    pub created_at: String,
    pub updated_at: String,
    pub email: String,
}

impl From<UserProfile> for UserResponse {
    fn from(user: UserProfile) -> Self {
        Self {
            id: user.id.to_string(),
            created_at: user.created_at.to_rfc3339(),
            updated_at: user.updated_at.to_rfc3339(),
            email: user.email,
        }
    }
}

/// POST /api/users
///
/// # Errors
/// - 400: Invalid email or missing password
/// - 409: Email already registered
pub async fn create_user(
    form: web::Json<UserCredentialsRequest>,
    auth: web::Data<AuthService>,
) -> Result<HttpResponse, AppError> {
    let user = auth.register(&form.email, &form.password).await?;

    Ok(HttpResponse::Created().json(UserResponse::from(user)))
}

/// PUT /api/users
///
/// **Requires a valid access token**; the user is injected by `JwtMiddleware`.
///
/// # Errors
/// - 400: Invalid email or missing password
/// - 401: Missing, invalid or expired access token (handled by middleware)
/// - 404: User no longer exists
/// - 409: Email already registered
pub async fn update_user(
    user: web::ReqData<AuthenticatedUser>,
    form: web::Json<UserCredentialsRequest>,
    auth: web::Data<AuthService>,
) -> Result<HttpResponse, AppError> {
    let user = auth
        .update_credentials(user.user_id, &form.email, &form.password)
        .await?;

    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}
