/// Follow graph repository
use crate::models::{Follow, PublicUser};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

/// Check if a follower -> followee edge exists
pub async fn exists(
    pool: &PgPool,
    follower_id: Uuid,
    followee_id: Uuid,
) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>(
        r#"
        SELECT EXISTS(
            SELECT 1 FROM follows
            WHERE follower_id = $1 AND followee_id = $2
        )
        "#,
    )
    .bind(follower_id)
    .bind(followee_id)
    .fetch_one(pool)
    .await
}

/// Insert a follow edge. UNIQUE (follower_id, followee_id) is the source of
/// truth for duplicates; callers remap a unique violation.
pub async fn insert(
    tx: &mut Transaction<'_, Postgres>,
    follower_id: Uuid,
    followee_id: Uuid,
) -> Result<Follow, sqlx::Error> {
    sqlx::query_as::<_, Follow>(
        r#"
        INSERT INTO follows (id, follower_id, followee_id, created_at)
        VALUES ($1, $2, $3, NOW())
        RETURNING id, follower_id, followee_id, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(follower_id)
    .bind(followee_id)
    .fetch_one(&mut **tx)
    .await
}

/// Delete an edge by id, scoped to its owner; returns true if removed
pub async fn delete_by_id(
    pool: &PgPool,
    edge_id: Uuid,
    follower_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        DELETE FROM follows
        WHERE id = $1 AND follower_id = $2
        "#,
    )
    .bind(edge_id)
    .bind(follower_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Edges owned by a follower, most recent first
pub async fn list_for_follower(
    pool: &PgPool,
    follower_id: Uuid,
) -> Result<Vec<Follow>, sqlx::Error> {
    sqlx::query_as::<_, Follow>(
        r#"
        SELECT id, follower_id, followee_id, created_at
        FROM follows
        WHERE follower_id = $1
        ORDER BY created_at DESC
        "#,
    )
    .bind(follower_id)
    .fetch_all(pool)
    .await
}

/// The set of users a follower follows
pub async fn followee_ids(pool: &PgPool, follower_id: Uuid) -> Result<Vec<Uuid>, sqlx::Error> {
    sqlx::query_scalar::<_, Uuid>(
        r#"
        SELECT followee_id
        FROM follows
        WHERE follower_id = $1
        ORDER BY created_at DESC
        "#,
    )
    .bind(follower_id)
    .fetch_all(pool)
    .await
}

/// Users following the given user, with public profile data in one query
pub async fn followers_of(
    pool: &PgPool,
    user_id: Uuid,
    limit: i64,
    offset: i64,
) -> Result<Vec<PublicUser>, sqlx::Error> {
    sqlx::query_as::<_, PublicUser>(
        r#"
        SELECT u.id, u.username, u.avatar_url
        FROM follows f
        JOIN users u ON f.follower_id = u.id
        WHERE f.followee_id = $1
        ORDER BY f.created_at DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(user_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
}

/// Users the given user follows, with public profile data in one query
pub async fn following_of(
    pool: &PgPool,
    user_id: Uuid,
    limit: i64,
    offset: i64,
) -> Result<Vec<PublicUser>, sqlx::Error> {
    sqlx::query_as::<_, PublicUser>(
        r#"
        SELECT u.id, u.username, u.avatar_url
        FROM follows f
        JOIN users u ON f.followee_id = u.id
        WHERE f.follower_id = $1
        ORDER BY f.created_at DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(user_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
}
