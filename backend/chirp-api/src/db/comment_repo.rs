/// Comment repository
use crate::models::{Comment, CommentView};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

/// Create a new comment
pub async fn insert(
    tx: &mut Transaction<'_, Postgres>,
    author_id: Uuid,
    post_id: Uuid,
    content: &str,
) -> Result<Comment, sqlx::Error> {
    sqlx::query_as::<_, Comment>(
        r#"
        INSERT INTO comments (id, author_id, post_id, content, created_at, updated_at)
        VALUES ($1, $2, $3, $4, NOW(), NOW())
        RETURNING id, author_id, post_id, content, created_at, updated_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(author_id)
    .bind(post_id)
    .bind(content)
    .fetch_one(&mut **tx)
    .await
}

/// Get a single comment by ID
pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Comment>, sqlx::Error> {
    sqlx::query_as::<_, Comment>(
        r#"
        SELECT id, author_id, post_id, content, created_at, updated_at
        FROM comments
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Paginated comments for a post, most recent first
pub async fn list_for_post(
    pool: &PgPool,
    post_id: Uuid,
    limit: i64,
    offset: i64,
) -> Result<Vec<CommentView>, sqlx::Error> {
    sqlx::query_as::<_, CommentView>(
        r#"
        SELECT c.id, c.author_id, u.username AS author_username, c.post_id, c.content,
               c.created_at, c.updated_at
        FROM comments c
        JOIN users u ON u.id = c.author_id
        WHERE c.post_id = $1
        ORDER BY c.created_at DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(post_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
}

/// Update a comment's content
pub async fn update_content(
    pool: &PgPool,
    id: Uuid,
    content: &str,
) -> Result<Option<Comment>, sqlx::Error> {
    sqlx::query_as::<_, Comment>(
        r#"
        UPDATE comments
        SET content = $2, updated_at = NOW()
        WHERE id = $1
        RETURNING id, author_id, post_id, content, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(content)
    .fetch_optional(pool)
    .await
}

/// Delete a comment
pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM comments WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Comment count for a post
pub async fn count_for_post(pool: &PgPool, post_id: Uuid) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM comments WHERE post_id = $1")
        .bind(post_id)
        .fetch_one(pool)
        .await
}
