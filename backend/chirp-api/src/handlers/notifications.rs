/// Notification handlers
use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::handlers::PaginationParams;
use crate::middleware::UserId;
use crate::models::Notification;
use crate::services::NotificationService;

#[derive(Debug, Deserialize)]
pub struct MarkReadRequest {
    pub read: bool,
}

#[derive(Debug, Serialize)]
pub struct NotificationListResponse {
    pub notifications: Vec<Notification>,
    pub unread_count: i64,
    pub limit: i64,
    pub offset: i64,
}

/// GET /api/v1/notifications
pub async fn list_notifications(
    service: web::Data<NotificationService>,
    user: UserId,
    query: web::Query<PaginationParams>,
) -> Result<HttpResponse> {
    let (limit, offset) = query.clamped();
    let notifications = service.list_for_user(user.0, limit, offset).await?;
    let unread_count = service.unread_count(user.0).await?;

    Ok(HttpResponse::Ok().json(NotificationListResponse {
        notifications,
        unread_count,
        limit,
        offset,
    }))
}

/// GET /api/v1/notifications/{id}
pub async fn get_notification(
    service: web::Data<NotificationService>,
    path: web::Path<Uuid>,
    user: UserId,
) -> Result<HttpResponse> {
    let notification = service.get(*path, user.0).await?;
    Ok(HttpResponse::Ok().json(notification))
}

/// PATCH /api/v1/notifications/{id}
pub async fn mark_as_read(
    service: web::Data<NotificationService>,
    path: web::Path<Uuid>,
    user: UserId,
    req: web::Json<MarkReadRequest>,
) -> Result<HttpResponse> {
    // The read flag only moves one way.
    if !req.read {
        return Err(AppError::Validation(
            "notifications cannot be marked unread".to_string(),
        ));
    }

    let notification = service.mark_read(*path, user.0).await?;
    Ok(HttpResponse::Ok().json(notification))
}

/// PATCH /api/v1/notifications/mark_all_as_read
pub async fn mark_all_as_read(
    service: web::Data<NotificationService>,
    user: UserId,
) -> Result<HttpResponse> {
    let count = service.mark_all_read(user.0).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({"count": count})))
}
