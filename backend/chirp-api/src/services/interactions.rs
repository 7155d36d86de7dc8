use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::db::{comment_repo, like_repo, post_repo, user_repo};
use crate::error::{is_unique_violation, AppError, Result};
use crate::models::{Comment, Like, NewNotification, NotificationKind, Post, User};
use crate::services::notifications;

/// Like and comment write paths.
///
/// Same shape as the follow path: the engagement row and the notification to
/// the post author are one transaction. Authors acting on their own posts
/// get no notification.
#[derive(Clone)]
pub struct InteractionService {
    pool: PgPool,
}

impl InteractionService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn load_actor_and_post(&self, user_id: Uuid, post_id: Uuid) -> Result<(User, Post)> {
        let actor = user_repo::find_by_id(&self.pool, user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("user not found".to_string()))?;

        let post = post_repo::find_by_id(&self.pool, post_id)
            .await?
            .ok_or_else(|| AppError::NotFound("post not found".to_string()))?;

        Ok((actor, post))
    }

    /// Like a post, notifying its author.
    pub async fn like_post(&self, user_id: Uuid, post_id: Uuid) -> Result<Like> {
        let (actor, post) = self.load_actor_and_post(user_id, post_id).await?;

        // Advisory; the unique constraint is the source of truth.
        if like_repo::exists(&self.pool, user_id, post_id).await? {
            return Err(AppError::Conflict(
                "you have already liked this post".to_string(),
            ));
        }

        let mut tx = self.pool.begin().await?;

        let like = match like_repo::insert(&mut tx, user_id, post_id).await {
            Ok(like) => like,
            Err(e) if is_unique_violation(&e) => {
                return Err(AppError::Conflict(
                    "you have already liked this post".to_string(),
                ));
            }
            Err(e) => return Err(e.into()),
        };

        if post.author_id != user_id {
            notifications::emit(
                &mut tx,
                &NewNotification {
                    recipient_id: post.author_id,
                    sender_id: Some(user_id),
                    post_id: Some(post_id),
                    comment_id: None,
                    kind: NotificationKind::Like,
                    message: format!("{} liked your post.", actor.username),
                },
            )
            .await?;
        }

        tx.commit().await?;

        info!(user_id = %user_id, post_id = %post_id, "post liked");
        Ok(like)
    }

    /// Remove a like. No notification retraction: the like path may not have
    /// produced one in the first place.
    pub async fn unlike_post(&self, user_id: Uuid, post_id: Uuid) -> Result<()> {
        let deleted = like_repo::delete(&self.pool, user_id, post_id).await?;
        if !deleted {
            return Err(AppError::NotFound(
                "you have not liked this post".to_string(),
            ));
        }

        info!(user_id = %user_id, post_id = %post_id, "post unliked");
        Ok(())
    }

    /// Comment on a post, notifying its author.
    pub async fn add_comment(&self, user_id: Uuid, post_id: Uuid, content: &str) -> Result<Comment> {
        let content = content.trim();
        if content.is_empty() {
            return Err(AppError::Validation(
                "comment content cannot be empty".to_string(),
            ));
        }

        let (actor, post) = self.load_actor_and_post(user_id, post_id).await?;

        let mut tx = self.pool.begin().await?;

        let comment = comment_repo::insert(&mut tx, user_id, post_id, content).await?;

        if post.author_id != user_id {
            notifications::emit(
                &mut tx,
                &NewNotification {
                    recipient_id: post.author_id,
                    sender_id: Some(user_id),
                    post_id: Some(post_id),
                    comment_id: Some(comment.id),
                    kind: NotificationKind::Comment,
                    message: format!("{} commented on your post.", actor.username),
                },
            )
            .await?;
        }

        tx.commit().await?;

        info!(user_id = %user_id, post_id = %post_id, comment_id = %comment.id, "comment added");
        Ok(comment)
    }
}
