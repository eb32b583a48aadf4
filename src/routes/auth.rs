/// Authentication Routes
///
/// Login, access token refresh and refresh token revocation. The refresh
/// and revoke endpoints take the refresh token as a bearer credential.

use actix_web::{web, HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::auth::{authorization_value, AuthService};
use crate::error::AppError;

/// User login request
#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login response: user profile plus both tokens
#[derive(Serialize)]
pub struct LoginResponse {
    pub id: String,
    pub created_at: String,
    pub updated_at: String,
    pub email: String,
    pub token: String,
    pub refresh_token: String,
}

/// Token refresh response
#[derive(Serialize)]
pub struct RefreshResponse {
    pub token: String,
}

/// POST /api/login
///
/// # Errors
/// - 400: Missing email
/// - 401: Invalid credentials (email not found or wrong password)
/// - 500: Internal server error
pub async fn login(
    form: web::Json<LoginRequest>,
    auth: web::Data<AuthService>,
) -> Result<HttpResponse, AppError> {
    let outcome = auth.login(&form.email, &form.password).await?;

    Ok(HttpResponse::Ok().json(LoginResponse {
        id: outcome.user.id.to_string(),
        created_at: outcome.user.created_at.to_rfc3339(),
        updated_at: outcome.user.updated_at.to_rfc3339(),
        email: outcome.user.email,
        token: outcome.access_token,
        refresh_token: outcome.refresh_token,
    }))
}

/// POST /api/refresh
///
/// Issues a new access token. The refresh token stays valid and is not rotated.
///
/// # Errors
/// - 400: Missing or malformed Authorization header
/// - 401: Unknown, revoked or expired refresh token
pub async fn refresh(
    req: HttpRequest,
    auth: web::Data<AuthService>,
) -> Result<HttpResponse, AppError> {
    let header = authorization_value(req.headers())?;
    let token = auth.refresh(header).await?;

    Ok(HttpResponse::Ok().json(RefreshResponse { token }))
}

/// POST /api/revoke
///
/// Idempotent: revoking an already revoked token still returns 204.
///
/// # Errors
/// - 400: Missing or malformed Authorization header
pub async fn revoke(
    req: HttpRequest,
    auth: web::Data<AuthService>,
) -> Result<HttpResponse, AppError> {
    let header = authorization_value(req.headers())?;
    auth.revoke(header).await?;

    Ok(HttpResponse::NoContent().finish())
}
