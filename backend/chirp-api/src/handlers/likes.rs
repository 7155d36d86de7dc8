/// Like handlers
use actix_web::{web, HttpResponse};
use uuid::Uuid;

use crate::error::Result;
use crate::middleware::UserId;
use crate::services::InteractionService;

/// POST /api/v1/posts/{post_id}/like
pub async fn like_post(
    service: web::Data<InteractionService>,
    path: web::Path<Uuid>,
    user: UserId,
) -> Result<HttpResponse> {
    let like = service.like_post(user.0, *path).await?;
    Ok(HttpResponse::Created().json(like))
}

/// POST /api/v1/posts/{post_id}/unlike
pub async fn unlike_post(
    service: web::Data<InteractionService>,
    path: web::Path<Uuid>,
    user: UserId,
) -> Result<HttpResponse> {
    service.unlike_post(user.0, *path).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({"status": "ok"})))
}
