use sqlx::{PgPool, Postgres, Transaction};
use tracing::info;
use uuid::Uuid;

use crate::db::notification_repo;
use crate::error::{is_foreign_key_violation, AppError, Result};
use crate::models::{NewNotification, Notification};
use crate::policy;

/// Append a notification inside the caller's transaction.
///
/// This is the only entry point to the sink: notifications exist solely as
/// side effects of follow/like/comment writes, so emission always rides the
/// transaction that carries the triggering insert.
pub async fn emit(
    tx: &mut Transaction<'_, Postgres>,
    notification: &NewNotification,
) -> Result<Notification> {
    match notification_repo::insert(tx, notification).await {
        Ok(notification) => Ok(notification),
        Err(e) if is_foreign_key_violation(&e) => Err(AppError::NotFound(
            "notification recipient not found".to_string(),
        )),
        Err(e) => Err(e.into()),
    }
}

/// Read side of the notification sink, scoped to the recipient.
#[derive(Clone)]
pub struct NotificationService {
    pool: PgPool,
}

impl NotificationService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Recipient's notifications, newest first.
    pub async fn list_for_user(
        &self,
        recipient_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Notification>> {
        Ok(notification_repo::list_for_recipient(&self.pool, recipient_id, limit, offset).await?)
    }

    /// Count of unread notifications.
    pub async fn unread_count(&self, recipient_id: Uuid) -> Result<i64> {
        Ok(notification_repo::count_unread(&self.pool, recipient_id).await?)
    }

    /// Fetch one notification; only its recipient may see it.
    pub async fn get(&self, notification_id: Uuid, requester_id: Uuid) -> Result<Notification> {
        let notification = notification_repo::find_by_id(&self.pool, notification_id)
            .await?
            .ok_or_else(|| AppError::NotFound("notification not found".to_string()))?;

        policy::require_owner(notification.recipient_id, requester_id, "notification")?;
        Ok(notification)
    }

    /// Flip read to true. Idempotent: marking an already-read notification
    /// changes nothing and there is no transition back to unread.
    pub async fn mark_read(&self, notification_id: Uuid, requester_id: Uuid) -> Result<Notification> {
        let notification = notification_repo::find_by_id(&self.pool, notification_id)
            .await?
            .ok_or_else(|| AppError::NotFound("notification not found".to_string()))?;

        policy::require_owner(notification.recipient_id, requester_id, "notification")?;

        notification_repo::mark_read(&self.pool, notification_id)
            .await?
            .ok_or_else(|| AppError::NotFound("notification not found".to_string()))
    }

    /// Mark every unread notification read in one set-based update; returns
    /// the number of rows affected.
    pub async fn mark_all_read(&self, recipient_id: Uuid) -> Result<u64> {
        let affected = notification_repo::mark_all_read(&self.pool, recipient_id).await?;
        info!(recipient_id = %recipient_id, affected, "notifications marked read");
        Ok(affected)
    }
}
