/// Notification repository
///
/// The single write path into the notifications table. Inserts take the
/// transaction that carries the triggering follow/like/comment write.
use crate::models::{NewNotification, Notification};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

const NOTIFICATION_COLUMNS: &str =
    "id, recipient_id, sender_id, post_id, comment_id, kind, message, is_read, read_at, created_at";

/// Append a notification row with read = false
pub async fn insert(
    tx: &mut Transaction<'_, Postgres>,
    notification: &NewNotification,
) -> Result<Notification, sqlx::Error> {
    let sql = format!(
        r#"
        INSERT INTO notifications (id, recipient_id, sender_id, post_id, comment_id, kind, message, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, NOW())
        RETURNING {NOTIFICATION_COLUMNS}
        "#
    );
    sqlx::query_as::<_, Notification>(&sql)
        .bind(Uuid::new_v4())
        .bind(notification.recipient_id)
        .bind(notification.sender_id)
        .bind(notification.post_id)
        .bind(notification.comment_id)
        .bind(notification.kind)
        .bind(&notification.message)
        .fetch_one(&mut **tx)
        .await
}

/// Get a single notification by ID
pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Notification>, sqlx::Error> {
    let sql = format!(
        r#"
        SELECT {NOTIFICATION_COLUMNS}
        FROM notifications
        WHERE id = $1
        "#
    );
    sqlx::query_as::<_, Notification>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// All notifications for a recipient, newest first
pub async fn list_for_recipient(
    pool: &PgPool,
    recipient_id: Uuid,
    limit: i64,
    offset: i64,
) -> Result<Vec<Notification>, sqlx::Error> {
    let sql = format!(
        r#"
        SELECT {NOTIFICATION_COLUMNS}
        FROM notifications
        WHERE recipient_id = $1
        ORDER BY created_at DESC
        LIMIT $2 OFFSET $3
        "#
    );
    sqlx::query_as::<_, Notification>(&sql)
        .bind(recipient_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
}

/// Count of unread notifications for a recipient
pub async fn count_unread(pool: &PgPool, recipient_id: Uuid) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM notifications WHERE recipient_id = $1 AND is_read = FALSE",
    )
    .bind(recipient_id)
    .fetch_one(pool)
    .await
}

/// Set read = true on one notification. Idempotent: a second call leaves the
/// row (including read_at) unchanged.
pub async fn mark_read(pool: &PgPool, id: Uuid) -> Result<Option<Notification>, sqlx::Error> {
    let sql = format!(
        r#"
        UPDATE notifications
        SET is_read = TRUE, read_at = COALESCE(read_at, NOW())
        WHERE id = $1
        RETURNING {NOTIFICATION_COLUMNS}
        "#
    );
    sqlx::query_as::<_, Notification>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Set read = true on every currently-unread notification for a recipient.
/// Single set-based statement so it stays correct under concurrent emission;
/// returns the number of rows flipped.
pub async fn mark_all_read(pool: &PgPool, recipient_id: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE notifications
        SET is_read = TRUE, read_at = NOW()
        WHERE recipient_id = $1 AND is_read = FALSE
        "#,
    )
    .bind(recipient_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}
