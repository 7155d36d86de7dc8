/// Post handlers - HTTP endpoints for post operations
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::db::post_repo;
use crate::error::{AppError, Result};
use crate::handlers::PaginationParams;
use crate::middleware::UserId;
use crate::policy;

#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    pub content: String,
    pub media_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePostRequest {
    pub content: String,
    pub media_url: Option<String>,
}

fn validated_content(content: &str) -> Result<&str> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(
            "post content cannot be empty".to_string(),
        ));
    }
    Ok(trimmed)
}

/// POST /api/v1/posts
pub async fn create_post(
    pool: web::Data<PgPool>,
    user: UserId,
    req: web::Json<CreatePostRequest>,
) -> Result<HttpResponse> {
    let content = validated_content(&req.content)?;

    let post = post_repo::create_post(&pool, user.0, content, req.media_url.as_deref()).await?;

    info!(post_id = %post.id, author_id = %user.0, "post created");
    Ok(HttpResponse::Created().json(post))
}

/// GET /api/v1/posts
pub async fn list_posts(
    pool: web::Data<PgPool>,
    query: web::Query<PaginationParams>,
) -> Result<HttpResponse> {
    let (limit, offset) = query.clamped();
    let posts = post_repo::list_recent(&pool, limit, offset).await?;
    Ok(HttpResponse::Ok().json(posts))
}

/// GET /api/v1/posts/{post_id}
pub async fn get_post(pool: web::Data<PgPool>, path: web::Path<Uuid>) -> Result<HttpResponse> {
    let post = post_repo::find_view_by_id(&pool, *path)
        .await?
        .ok_or_else(|| AppError::NotFound("post not found".to_string()))?;
    Ok(HttpResponse::Ok().json(post))
}

/// GET /api/v1/posts/user/{user_id}
pub async fn get_user_posts(
    pool: web::Data<PgPool>,
    path: web::Path<Uuid>,
    query: web::Query<PaginationParams>,
) -> Result<HttpResponse> {
    let (limit, offset) = query.clamped();
    let posts = post_repo::list_by_author(&pool, *path, limit, offset).await?;
    Ok(HttpResponse::Ok().json(posts))
}

/// PATCH /api/v1/posts/{post_id}
pub async fn update_post(
    pool: web::Data<PgPool>,
    path: web::Path<Uuid>,
    user: UserId,
    req: web::Json<UpdatePostRequest>,
) -> Result<HttpResponse> {
    let content = validated_content(&req.content)?;

    let post = post_repo::find_by_id(&pool, *path)
        .await?
        .ok_or_else(|| AppError::NotFound("post not found".to_string()))?;

    policy::require_owner(post.author_id, user.0, "post")?;

    let updated = post_repo::update_post(&pool, post.id, content, req.media_url.as_deref())
        .await?
        .ok_or_else(|| AppError::NotFound("post not found".to_string()))?;

    Ok(HttpResponse::Ok().json(updated))
}

/// DELETE /api/v1/posts/{post_id}
pub async fn delete_post(
    pool: web::Data<PgPool>,
    path: web::Path<Uuid>,
    user: UserId,
) -> Result<HttpResponse> {
    let post = post_repo::find_by_id(&pool, *path)
        .await?
        .ok_or_else(|| AppError::NotFound("post not found".to_string()))?;

    policy::require_owner(post.author_id, user.0, "post")?;

    post_repo::delete_post(&pool, post.id).await?;

    info!(post_id = %post.id, author_id = %user.0, "post deleted");
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_is_trimmed_and_must_be_non_empty() {
        assert_eq!(validated_content("  hello  ").unwrap(), "hello");
        assert!(matches!(
            validated_content("   "),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(validated_content(""), Err(AppError::Validation(_))));
    }
}
