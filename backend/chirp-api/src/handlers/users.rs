/// User profile handlers
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::db::{follow_repo, user_repo};
use crate::error::{AppError, Result};
use crate::handlers::PaginationParams;
use crate::middleware::UserId;
use crate::models::{PublicUser, UserProfile};
use crate::policy;

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(max = 500))]
    pub bio: Option<String>,

    #[validate(length(max = 2048))]
    pub avatar_url: Option<String>,
}

/// GET /api/v1/users
pub async fn list_users(
    pool: web::Data<PgPool>,
    query: web::Query<PaginationParams>,
) -> Result<HttpResponse> {
    let (limit, offset) = query.clamped();
    let users = user_repo::list_public(&pool, limit, offset).await?;
    Ok(HttpResponse::Ok().json(users))
}

/// GET /api/v1/users/{id}
pub async fn get_user(pool: web::Data<PgPool>, path: web::Path<Uuid>) -> Result<HttpResponse> {
    let user = user_repo::find_by_id(&pool, *path)
        .await?
        .ok_or_else(|| AppError::NotFound("user not found".to_string()))?;

    Ok(HttpResponse::Ok().json(PublicUser {
        id: user.id,
        username: user.username,
        avatar_url: user.avatar_url,
    }))
}

/// PATCH /api/v1/users/{id}
pub async fn update_profile(
    pool: web::Data<PgPool>,
    path: web::Path<Uuid>,
    user: UserId,
    req: web::Json<UpdateProfileRequest>,
) -> Result<HttpResponse> {
    req.validate()?;
    policy::require_owner(*path, user.0, "profile")?;

    let updated = user_repo::update_profile(&pool, *path, req.bio.as_deref(), req.avatar_url.as_deref())
        .await?
        .ok_or_else(|| AppError::NotFound("user not found".to_string()))?;

    Ok(HttpResponse::Ok().json(UserProfile::from(updated)))
}

/// DELETE /api/v1/users/{id}
pub async fn delete_user(
    pool: web::Data<PgPool>,
    path: web::Path<Uuid>,
    user: UserId,
) -> Result<HttpResponse> {
    policy::require_owner(*path, user.0, "account")?;

    let deleted = user_repo::delete_user(&pool, *path).await?;
    if !deleted {
        return Err(AppError::NotFound("user not found".to_string()));
    }

    info!(user_id = %user.0, "account deleted");
    Ok(HttpResponse::NoContent().finish())
}

/// GET /api/v1/users/{id}/followers
pub async fn get_followers(
    pool: web::Data<PgPool>,
    path: web::Path<Uuid>,
    query: web::Query<PaginationParams>,
) -> Result<HttpResponse> {
    if !user_repo::exists(&pool, *path).await? {
        return Err(AppError::NotFound("user not found".to_string()));
    }

    let (limit, offset) = query.clamped();
    let users = follow_repo::followers_of(&pool, *path, limit, offset).await?;
    let count = users.len();
    Ok(HttpResponse::Ok().json(serde_json::json!({"users": users, "count": count})))
}

/// GET /api/v1/users/{id}/following
pub async fn get_following(
    pool: web::Data<PgPool>,
    path: web::Path<Uuid>,
    query: web::Query<PaginationParams>,
) -> Result<HttpResponse> {
    if !user_repo::exists(&pool, *path).await? {
        return Err(AppError::NotFound("user not found".to_string()));
    }

    let (limit, offset) = query.clamped();
    let users = follow_repo::following_of(&pool, *path, limit, offset).await?;
    let count = users.len();
    Ok(HttpResponse::Ok().json(serde_json::json!({"users": users, "count": count})))
}
