//! Database-backed flow tests for the follow/feed/notification core.
//!
//! These run against the database named by TEST_DATABASE_URL and are skipped
//! when it is not set, so `cargo test` stays green without infrastructure.

use chirp_api::db::{follow_repo, like_repo, post_repo, user_repo};
use chirp_api::error::AppError;
use chirp_api::models::{NotificationKind, Post, User};
use chirp_api::services::{
    FeedQuery, FeedService, FollowService, InteractionService, NotificationService,
};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

async fn test_pool() -> Option<PgPool> {
    let Ok(url) = std::env::var("TEST_DATABASE_URL") else {
        eprintln!("TEST_DATABASE_URL not set; skipping database-backed test");
        return None;
    };

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&url)
        .await
        .expect("failed to connect to test database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("failed to run migrations");

    Some(pool)
}

async fn create_user(pool: &PgPool) -> User {
    let tag = Uuid::new_v4().simple().to_string();
    user_repo::create_user(
        pool,
        &format!("user_{tag}"),
        &format!("{tag}@example.com"),
        "test-password-hash",
    )
    .await
    .expect("failed to create test user")
}

async fn create_post(pool: &PgPool, author: &User, content: &str) -> Post {
    post_repo::create_post(pool, author.id, content, None)
        .await
        .expect("failed to create test post")
}

#[tokio::test]
async fn self_follow_is_rejected() {
    let Some(pool) = test_pool().await else { return };
    let follows = FollowService::new(pool.clone());

    let user = create_user(&pool).await;
    let result = follows.follow(user.id, user.id).await;
    assert!(matches!(result, Err(AppError::SelfReference(_))));
}

#[tokio::test]
async fn duplicate_follow_is_rejected_and_graph_unchanged() {
    let Some(pool) = test_pool().await else { return };
    let follows = FollowService::new(pool.clone());

    let a = create_user(&pool).await;
    let b = create_user(&pool).await;

    follows.follow(a.id, b.id).await.expect("first follow");
    let second = follows.follow(a.id, b.id).await;
    assert!(matches!(second, Err(AppError::Conflict(_))));

    let edges = follows.list_following(a.id).await.expect("list");
    assert_eq!(edges.len(), 1);
    assert_eq!(edges[0].followee_id, b.id);
}

#[tokio::test]
async fn follow_notifies_followee_and_unfollow_keeps_the_log() {
    let Some(pool) = test_pool().await else { return };
    let follows = FollowService::new(pool.clone());
    let notifications = NotificationService::new(pool.clone());

    let a = create_user(&pool).await;
    let b = create_user(&pool).await;

    let edge = follows.follow(a.id, b.id).await.expect("follow");

    let inbox = notifications.list_for_user(b.id, 50, 0).await.expect("list");
    assert_eq!(inbox.len(), 1);
    assert_eq!(inbox[0].kind, NotificationKind::Follow);
    assert_eq!(inbox[0].sender_id, Some(a.id));
    assert!(!inbox[0].is_read);

    follows.unfollow(a.id, edge.id).await.expect("unfollow");
    assert!(follows.list_following(a.id).await.expect("list").is_empty());

    // Unfollow deletes the edge, not the notification log.
    let inbox = notifications.list_for_user(b.id, 50, 0).await.expect("list");
    assert_eq!(inbox.len(), 1);

    // A second unfollow of the same edge is a NotFound, not a crash.
    let missing = follows.unfollow(a.id, edge.id).await;
    assert!(matches!(missing, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn feed_is_empty_without_followees() {
    let Some(pool) = test_pool().await else { return };
    let feed = FeedService::new(pool.clone(), false);

    let viewer = create_user(&pool).await;
    let posts = feed
        .compose_feed(viewer.id, &FeedQuery::default())
        .await
        .expect("feed");
    assert!(posts.is_empty());
}

#[tokio::test]
async fn feed_orders_most_recent_first() {
    let Some(pool) = test_pool().await else { return };
    let follows = FollowService::new(pool.clone());
    let feed = FeedService::new(pool.clone(), false);

    let viewer = create_user(&pool).await;
    let a = create_user(&pool).await;
    let b = create_user(&pool).await;
    follows.follow(viewer.id, a.id).await.expect("follow a");
    follows.follow(viewer.id, b.id).await.expect("follow b");

    let p1 = create_post(&pool, &a, "first").await;
    let p2 = create_post(&pool, &b, "second").await;
    let p3 = create_post(&pool, &a, "third").await;

    let posts = feed
        .compose_feed(viewer.id, &FeedQuery::default())
        .await
        .expect("feed");

    let ids: Vec<Uuid> = posts.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![p3.id, p2.id, p1.id]);
}

#[tokio::test]
async fn feed_keyword_filter_matches_content_case_insensitively() {
    let Some(pool) = test_pool().await else { return };
    let follows = FollowService::new(pool.clone());
    let feed = FeedService::new(pool.clone(), false);

    let viewer = create_user(&pool).await;
    let author = create_user(&pool).await;
    follows.follow(viewer.id, author.id).await.expect("follow");

    let hello = create_post(&pool, &author, "hello world").await;
    create_post(&pool, &author, "goodbye").await;

    let query = FeedQuery {
        keyword: Some("HELLO".to_string()),
        ..Default::default()
    };
    let posts = feed.compose_feed(viewer.id, &query).await.expect("feed");
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].id, hello.id);
}

#[tokio::test]
async fn feed_keyword_filter_matches_author_username() {
    let Some(pool) = test_pool().await else { return };
    let follows = FollowService::new(pool.clone());
    let feed = FeedService::new(pool.clone(), false);

    let viewer = create_user(&pool).await;
    let author = create_user(&pool).await;
    follows.follow(viewer.id, author.id).await.expect("follow");
    create_post(&pool, &author, "nothing matching here").await;

    // Usernames are `user_<uuid>`; match on a distinctive chunk of it.
    let chunk = author.username[5..21].to_string();
    let query = FeedQuery {
        keyword: Some(chunk),
        ..Default::default()
    };
    let posts = feed.compose_feed(viewer.id, &query).await.expect("feed");
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].author_id, author.id);
}

#[tokio::test]
async fn feed_malformed_date_is_ignored_in_lenient_mode() {
    let Some(pool) = test_pool().await else { return };
    let follows = FollowService::new(pool.clone());
    let feed = FeedService::new(pool.clone(), false);

    let viewer = create_user(&pool).await;
    let author = create_user(&pool).await;
    follows.follow(viewer.id, author.id).await.expect("follow");
    create_post(&pool, &author, "dated post").await;

    let query = FeedQuery {
        date: Some("2023-13-99".to_string()),
        ..Default::default()
    };
    let posts = feed.compose_feed(viewer.id, &query).await.expect("feed");
    assert_eq!(posts.len(), 1);
}

#[tokio::test]
async fn feed_malformed_date_is_rejected_in_strict_mode() {
    let Some(pool) = test_pool().await else { return };
    let feed = FeedService::new(pool.clone(), true);

    let viewer = create_user(&pool).await;
    let query = FeedQuery {
        date: Some("2023-13-99".to_string()),
        ..Default::default()
    };
    let result = feed.compose_feed(viewer.id, &query).await;
    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn duplicate_like_is_rejected_and_exactly_one_row_exists() {
    let Some(pool) = test_pool().await else { return };
    let interactions = InteractionService::new(pool.clone());

    let author = create_user(&pool).await;
    let liker = create_user(&pool).await;
    let post = create_post(&pool, &author, "like me").await;

    interactions.like_post(liker.id, post.id).await.expect("like");
    let second = interactions.like_post(liker.id, post.id).await;
    assert!(matches!(second, Err(AppError::Conflict(_))));

    let count = like_repo::count_for_post(&pool, post.id).await.expect("count");
    assert_eq!(count, 1);
}

#[tokio::test]
async fn like_notifies_the_author_but_never_the_actor_themselves() {
    let Some(pool) = test_pool().await else { return };
    let interactions = InteractionService::new(pool.clone());
    let notifications = NotificationService::new(pool.clone());

    let author = create_user(&pool).await;
    let liker = create_user(&pool).await;
    let post = create_post(&pool, &author, "like me").await;

    interactions.like_post(liker.id, post.id).await.expect("like");
    let inbox = notifications
        .list_for_user(author.id, 50, 0)
        .await
        .expect("list");
    assert_eq!(inbox.len(), 1);
    assert_eq!(inbox[0].kind, NotificationKind::Like);
    assert_eq!(inbox[0].post_id, Some(post.id));

    // The author liking their own post inserts the like but no notification.
    let own_post = create_post(&pool, &author, "my own").await;
    interactions
        .like_post(author.id, own_post.id)
        .await
        .expect("self like");
    let inbox = notifications
        .list_for_user(author.id, 50, 0)
        .await
        .expect("list");
    assert_eq!(inbox.len(), 1);
}

#[tokio::test]
async fn unlike_without_like_is_not_found() {
    let Some(pool) = test_pool().await else { return };
    let interactions = InteractionService::new(pool.clone());

    let author = create_user(&pool).await;
    let user = create_user(&pool).await;
    let post = create_post(&pool, &author, "nothing to unlike").await;

    let result = interactions.unlike_post(user.id, post.id).await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn empty_comment_is_rejected() {
    let Some(pool) = test_pool().await else { return };
    let interactions = InteractionService::new(pool.clone());

    let author = create_user(&pool).await;
    let commenter = create_user(&pool).await;
    let post = create_post(&pool, &author, "comment on me").await;

    let result = interactions.add_comment(commenter.id, post.id, "   ").await;
    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn comment_notifies_author_with_comment_reference() {
    let Some(pool) = test_pool().await else { return };
    let interactions = InteractionService::new(pool.clone());
    let notifications = NotificationService::new(pool.clone());

    let author = create_user(&pool).await;
    let commenter = create_user(&pool).await;
    let post = create_post(&pool, &author, "comment on me").await;

    let comment = interactions
        .add_comment(commenter.id, post.id, "  trimmed content  ")
        .await
        .expect("comment");
    assert_eq!(comment.content, "trimmed content");

    let inbox = notifications
        .list_for_user(author.id, 50, 0)
        .await
        .expect("list");
    assert_eq!(inbox.len(), 1);
    assert_eq!(inbox[0].kind, NotificationKind::Comment);
    assert_eq!(inbox[0].comment_id, Some(comment.id));
}

#[tokio::test]
async fn mark_all_read_flips_every_unread_and_reports_the_count() {
    let Some(pool) = test_pool().await else { return };
    let interactions = InteractionService::new(pool.clone());
    let notifications = NotificationService::new(pool.clone());

    let author = create_user(&pool).await;
    let fan = create_user(&pool).await;
    let post = create_post(&pool, &author, "popular post").await;

    interactions.like_post(fan.id, post.id).await.expect("like");
    interactions
        .add_comment(fan.id, post.id, "nice")
        .await
        .expect("comment");

    assert_eq!(notifications.unread_count(author.id).await.expect("count"), 2);

    let affected = notifications.mark_all_read(author.id).await.expect("mark all");
    assert_eq!(affected, 2);

    let inbox = notifications
        .list_for_user(author.id, 50, 0)
        .await
        .expect("list");
    assert!(inbox.iter().all(|n| n.is_read));

    // Idempotent: nothing left to flip.
    let affected = notifications.mark_all_read(author.id).await.expect("mark all");
    assert_eq!(affected, 0);
}

#[tokio::test]
async fn mark_read_by_non_recipient_is_forbidden_and_flag_unchanged() {
    let Some(pool) = test_pool().await else { return };
    let follows = FollowService::new(pool.clone());
    let notifications = NotificationService::new(pool.clone());

    let a = create_user(&pool).await;
    let b = create_user(&pool).await;
    let other = create_user(&pool).await;

    follows.follow(a.id, b.id).await.expect("follow");
    let inbox = notifications.list_for_user(b.id, 50, 0).await.expect("list");
    let notification = &inbox[0];

    let result = notifications.mark_read(notification.id, other.id).await;
    assert!(matches!(result, Err(AppError::Forbidden(_))));

    let unchanged = notifications
        .get(notification.id, b.id)
        .await
        .expect("recipient can read");
    assert!(!unchanged.is_read);

    // The recipient can flip it, and a second flip is a no-op.
    let read = notifications
        .mark_read(notification.id, b.id)
        .await
        .expect("mark read");
    assert!(read.is_read);
    let again = notifications
        .mark_read(notification.id, b.id)
        .await
        .expect("idempotent");
    assert!(again.is_read);
    assert_eq!(again.read_at, read.read_at);
}

#[tokio::test]
async fn follow_edge_survives_only_with_its_notification() {
    let Some(pool) = test_pool().await else { return };
    let follows = FollowService::new(pool.clone());

    let a = create_user(&pool).await;
    let b = create_user(&pool).await;
    follows.follow(a.id, b.id).await.expect("follow");

    // Edge and notification were one transaction: both exist.
    assert!(follow_repo::exists(&pool, a.id, b.id).await.expect("exists"));
    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM notifications WHERE recipient_id = $1")
            .bind(b.id)
            .fetch_one(&pool)
            .await
            .expect("count");
    assert_eq!(count, 1);
}
