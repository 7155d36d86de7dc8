/// Follow graph handlers
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::Result;
use crate::middleware::UserId;
use crate::services::FollowService;

#[derive(Debug, Deserialize)]
pub struct CreateFollowRequest {
    pub followee_id: Uuid,
}

/// POST /api/v1/follows
pub async fn create_follow(
    service: web::Data<FollowService>,
    user: UserId,
    req: web::Json<CreateFollowRequest>,
) -> Result<HttpResponse> {
    let edge = service.follow(user.0, req.followee_id).await?;
    Ok(HttpResponse::Created().json(edge))
}

/// DELETE /api/v1/follows/{id}
pub async fn delete_follow(
    service: web::Data<FollowService>,
    path: web::Path<Uuid>,
    user: UserId,
) -> Result<HttpResponse> {
    service.unfollow(user.0, *path).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({"status": "ok"})))
}

/// GET /api/v1/follows
pub async fn list_follows(service: web::Data<FollowService>, user: UserId) -> Result<HttpResponse> {
    let edges = service.list_following(user.0).await?;
    Ok(HttpResponse::Ok().json(edges))
}
