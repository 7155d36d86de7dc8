/// Comment handlers
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::db::comment_repo;
use crate::error::{AppError, Result};
use crate::handlers::PaginationParams;
use crate::middleware::UserId;
use crate::policy;
use crate::services::InteractionService;

#[derive(Debug, Deserialize)]
pub struct CreateCommentRequest {
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCommentRequest {
    pub content: String,
}

/// POST /api/v1/posts/{post_id}/comments
pub async fn create_comment(
    service: web::Data<InteractionService>,
    path: web::Path<Uuid>,
    user: UserId,
    req: web::Json<CreateCommentRequest>,
) -> Result<HttpResponse> {
    let comment = service.add_comment(user.0, *path, &req.content).await?;
    Ok(HttpResponse::Created().json(comment))
}

/// GET /api/v1/posts/{post_id}/comments
pub async fn list_comments(
    pool: web::Data<PgPool>,
    path: web::Path<Uuid>,
    query: web::Query<PaginationParams>,
) -> Result<HttpResponse> {
    let (limit, offset) = query.clamped();
    let comments = comment_repo::list_for_post(&pool, *path, limit, offset).await?;
    Ok(HttpResponse::Ok().json(comments))
}

/// PATCH /api/v1/comments/{comment_id}
pub async fn update_comment(
    pool: web::Data<PgPool>,
    path: web::Path<Uuid>,
    user: UserId,
    req: web::Json<UpdateCommentRequest>,
) -> Result<HttpResponse> {
    let content = req.content.trim();
    if content.is_empty() {
        return Err(AppError::Validation(
            "comment content cannot be empty".to_string(),
        ));
    }

    let comment = comment_repo::find_by_id(&pool, *path)
        .await?
        .ok_or_else(|| AppError::NotFound("comment not found".to_string()))?;

    policy::require_owner(comment.author_id, user.0, "comment")?;

    let updated = comment_repo::update_content(&pool, comment.id, content)
        .await?
        .ok_or_else(|| AppError::NotFound("comment not found".to_string()))?;

    Ok(HttpResponse::Ok().json(updated))
}

/// DELETE /api/v1/comments/{comment_id}
pub async fn delete_comment(
    pool: web::Data<PgPool>,
    path: web::Path<Uuid>,
    user: UserId,
) -> Result<HttpResponse> {
    let comment = comment_repo::find_by_id(&pool, *path)
        .await?
        .ok_or_else(|| AppError::NotFound("comment not found".to_string()))?;

    policy::require_owner(comment.author_id, user.0, "comment")?;

    comment_repo::delete(&pool, comment.id).await?;

    info!(comment_id = %comment.id, author_id = %user.0, "comment deleted");
    Ok(HttpResponse::NoContent().finish())
}
