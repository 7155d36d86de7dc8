/// Post repository
use crate::models::{Post, PostView};
use sqlx::PgPool;
use uuid::Uuid;

const POST_VIEW_COLUMNS: &str = r#"
    p.id, p.author_id, u.username AS author_username, p.content, p.media_url,
    (SELECT COUNT(*) FROM likes l WHERE l.post_id = p.id) AS likes_count,
    (SELECT COUNT(*) FROM comments c WHERE c.post_id = p.id) AS comments_count,
    p.created_at, p.updated_at
"#;

/// Create a new post
pub async fn create_post(
    pool: &PgPool,
    author_id: Uuid,
    content: &str,
    media_url: Option<&str>,
) -> Result<Post, sqlx::Error> {
    sqlx::query_as::<_, Post>(
        r#"
        INSERT INTO posts (id, author_id, content, media_url, created_at, updated_at)
        VALUES ($1, $2, $3, $4, NOW(), NOW())
        RETURNING id, author_id, content, media_url, created_at, updated_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(author_id)
    .bind(content)
    .bind(media_url)
    .fetch_one(pool)
    .await
}

/// Find a post by ID
pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Post>, sqlx::Error> {
    sqlx::query_as::<_, Post>(
        r#"
        SELECT id, author_id, content, media_url, created_at, updated_at
        FROM posts
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Find a post with author username and engagement counts
pub async fn find_view_by_id(pool: &PgPool, id: Uuid) -> Result<Option<PostView>, sqlx::Error> {
    let sql = format!(
        r#"
        SELECT {POST_VIEW_COLUMNS}
        FROM posts p
        JOIN users u ON u.id = p.author_id
        WHERE p.id = $1
        "#
    );
    sqlx::query_as::<_, PostView>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// List all posts, most recent first
pub async fn list_recent(
    pool: &PgPool,
    limit: i64,
    offset: i64,
) -> Result<Vec<PostView>, sqlx::Error> {
    let sql = format!(
        r#"
        SELECT {POST_VIEW_COLUMNS}
        FROM posts p
        JOIN users u ON u.id = p.author_id
        ORDER BY p.created_at DESC
        LIMIT $1 OFFSET $2
        "#
    );
    sqlx::query_as::<_, PostView>(&sql)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
}

/// List a single author's posts, most recent first
pub async fn list_by_author(
    pool: &PgPool,
    author_id: Uuid,
    limit: i64,
    offset: i64,
) -> Result<Vec<PostView>, sqlx::Error> {
    let sql = format!(
        r#"
        SELECT {POST_VIEW_COLUMNS}
        FROM posts p
        JOIN users u ON u.id = p.author_id
        WHERE p.author_id = $1
        ORDER BY p.created_at DESC
        LIMIT $2 OFFSET $3
        "#
    );
    sqlx::query_as::<_, PostView>(&sql)
        .bind(author_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
}

/// Update a post's content and media reference
pub async fn update_post(
    pool: &PgPool,
    id: Uuid,
    content: &str,
    media_url: Option<&str>,
) -> Result<Option<Post>, sqlx::Error> {
    sqlx::query_as::<_, Post>(
        r#"
        UPDATE posts
        SET content = $2,
            media_url = COALESCE($3, media_url),
            updated_at = NOW()
        WHERE id = $1
        RETURNING id, author_id, content, media_url, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(content)
    .bind(media_url)
    .fetch_optional(pool)
    .await
}

/// Delete a post
pub async fn delete_post(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM posts WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
