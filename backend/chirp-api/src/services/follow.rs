use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::db::{follow_repo, user_repo};
use crate::error::{is_unique_violation, AppError, Result};
use crate::models::{Follow, NewNotification, NotificationKind};
use crate::services::notifications;

/// Follow graph operations.
///
/// The edge insert and the follow notification are one transaction: either
/// both commit or neither does.
#[derive(Clone)]
pub struct FollowService {
    pool: PgPool,
}

impl FollowService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a follower -> followee edge and notify the followee.
    pub async fn follow(&self, follower_id: Uuid, followee_id: Uuid) -> Result<Follow> {
        if follower_id == followee_id {
            return Err(AppError::SelfReference(
                "you cannot follow yourself".to_string(),
            ));
        }

        let follower = user_repo::find_by_id(&self.pool, follower_id)
            .await?
            .ok_or_else(|| AppError::NotFound("user not found".to_string()))?;

        if !user_repo::exists(&self.pool, followee_id).await? {
            return Err(AppError::NotFound("user not found".to_string()));
        }

        // Advisory pre-check; the unique constraint below remains the source
        // of truth under concurrent requests.
        if follow_repo::exists(&self.pool, follower_id, followee_id).await? {
            return Err(AppError::Conflict(
                "you are already following this user".to_string(),
            ));
        }

        let mut tx = self.pool.begin().await?;

        let edge = match follow_repo::insert(&mut tx, follower_id, followee_id).await {
            Ok(edge) => edge,
            Err(e) if is_unique_violation(&e) => {
                return Err(AppError::Conflict(
                    "you are already following this user".to_string(),
                ));
            }
            Err(e) => return Err(e.into()),
        };

        notifications::emit(
            &mut tx,
            &NewNotification {
                recipient_id: followee_id,
                sender_id: Some(follower_id),
                post_id: None,
                comment_id: None,
                kind: NotificationKind::Follow,
                message: format!("{} started following you.", follower.username),
            },
        )
        .await?;

        tx.commit().await?;

        info!(
            follower_id = %follower_id,
            followee_id = %followee_id,
            "follow edge created"
        );

        Ok(edge)
    }

    /// Remove an edge owned by the follower. No notification is emitted.
    pub async fn unfollow(&self, follower_id: Uuid, edge_id: Uuid) -> Result<()> {
        let deleted = follow_repo::delete_by_id(&self.pool, edge_id, follower_id).await?;
        if !deleted {
            return Err(AppError::NotFound(
                "follow relationship not found".to_string(),
            ));
        }

        info!(follower_id = %follower_id, edge_id = %edge_id, "follow edge removed");
        Ok(())
    }

    /// Edges owned by the follower, most recent first.
    pub async fn list_following(&self, follower_id: Uuid) -> Result<Vec<Follow>> {
        Ok(follow_repo::list_for_follower(&self.pool, follower_id).await?)
    }
}
