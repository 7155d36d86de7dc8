/// Registration, login and token handlers
use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::info;
use validator::Validate;

use crate::db::user_repo;
use crate::error::{is_unique_violation, AppError, Result};
use crate::models::UserProfile;
use crate::security::{jwt, password};

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 50))]
    pub username: String,

    #[validate(email)]
    pub email: String,

    #[validate(length(min = 8))]
    pub password: String,

    /// Confirmation copy of the password
    pub password2: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1))]
    pub username: String,

    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: UserProfile,
    pub tokens: jwt::TokenResponse,
}

/// POST /api/v1/auth/register
pub async fn register(
    pool: web::Data<PgPool>,
    req: web::Json<RegisterRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    if req.password != req.password2 {
        return Err(AppError::Validation(
            "password fields didn't match".to_string(),
        ));
    }

    // Advisory checks; the unique constraints below stay authoritative.
    if user_repo::find_by_username(&pool, &req.username).await?.is_some() {
        return Err(AppError::Conflict("username already taken".to_string()));
    }
    if user_repo::find_by_email(&pool, &req.email).await?.is_some() {
        return Err(AppError::Conflict("email already registered".to_string()));
    }

    let password_hash = password::hash_password(&req.password)?;

    let user = match user_repo::create_user(&pool, &req.username, &req.email, &password_hash).await
    {
        Ok(user) => user,
        Err(e) if is_unique_violation(&e) => {
            return Err(AppError::Conflict(
                "username or email already registered".to_string(),
            ));
        }
        Err(e) => return Err(e.into()),
    };

    let tokens = jwt::generate_token_pair(user.id, &user.username)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    info!(user_id = %user.id, username = %user.username, "user registered");

    Ok(HttpResponse::Created().json(AuthResponse {
        user: user.into(),
        tokens,
    }))
}

/// POST /api/v1/auth/login
pub async fn login(pool: web::Data<PgPool>, req: web::Json<LoginRequest>) -> Result<HttpResponse> {
    req.validate()?;

    let user = user_repo::find_by_username(&pool, &req.username)
        .await?
        .ok_or_else(|| AppError::Unauthorized("invalid credentials".to_string()))?;

    if !password::verify_password(&req.password, &user.password_hash)? {
        return Err(AppError::Unauthorized("invalid credentials".to_string()));
    }

    let tokens = jwt::generate_token_pair(user.id, &user.username)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    info!(user_id = %user.id, "user logged in");

    Ok(HttpResponse::Ok().json(AuthResponse {
        user: user.into(),
        tokens,
    }))
}

/// POST /api/v1/auth/refresh
pub async fn refresh(pool: web::Data<PgPool>, req: web::Json<RefreshRequest>) -> Result<HttpResponse> {
    let data = jwt::validate_token(&req.refresh_token)
        .map_err(|_| AppError::Unauthorized("invalid or expired refresh token".to_string()))?;

    if data.claims.token_type != "refresh" {
        return Err(AppError::Unauthorized(
            "refresh endpoint requires a refresh token".to_string(),
        ));
    }

    let user_id = uuid::Uuid::parse_str(&data.claims.sub)
        .map_err(|_| AppError::Unauthorized("invalid token subject".to_string()))?;

    // The account may have been deleted since the token was issued.
    let user = user_repo::find_by_id(&pool, user_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("account no longer exists".to_string()))?;

    let tokens = jwt::generate_token_pair(user.id, &user.username)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(HttpResponse::Ok().json(tokens))
}

/// POST /api/v1/auth/logout
///
/// Tokens are stateless; logout is the client discarding them.
pub async fn logout() -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "successfully logged out"
    })))
}
