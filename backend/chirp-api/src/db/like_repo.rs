/// Like repository
use crate::models::Like;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

/// Check if a user has liked a post
pub async fn exists(pool: &PgPool, user_id: Uuid, post_id: Uuid) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>(
        r#"
        SELECT EXISTS(
            SELECT 1 FROM likes
            WHERE user_id = $1 AND post_id = $2
        )
        "#,
    )
    .bind(user_id)
    .bind(post_id)
    .fetch_one(pool)
    .await
}

/// Insert a like. The UNIQUE (user_id, post_id) constraint is the source of
/// truth for duplicates; callers remap a unique violation to the domain
/// error.
pub async fn insert(
    tx: &mut Transaction<'_, Postgres>,
    user_id: Uuid,
    post_id: Uuid,
) -> Result<Like, sqlx::Error> {
    sqlx::query_as::<_, Like>(
        r#"
        INSERT INTO likes (id, user_id, post_id, created_at)
        VALUES ($1, $2, $3, NOW())
        RETURNING id, user_id, post_id, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(post_id)
    .fetch_one(&mut **tx)
    .await
}

/// Delete a like; returns true if a row was removed
pub async fn delete(pool: &PgPool, user_id: Uuid, post_id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        DELETE FROM likes
        WHERE user_id = $1 AND post_id = $2
        "#,
    )
    .bind(user_id)
    .bind(post_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Like count for a post
pub async fn count_for_post(pool: &PgPool, post_id: Uuid) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM likes WHERE post_id = $1")
        .bind(post_id)
        .fetch_one(pool)
        .await
}
