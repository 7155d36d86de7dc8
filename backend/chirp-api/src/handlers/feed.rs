/// Feed handler
use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::error::Result;
use crate::middleware::UserId;
use crate::services::{FeedQuery, FeedService};

#[derive(Debug, Deserialize)]
pub struct FeedParams {
    /// Keyword filter over post content and author username
    pub q: Option<String>,
    /// Calendar date filter, YYYY-MM-DD
    pub date: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// GET /api/v1/feed
pub async fn get_feed(
    service: web::Data<FeedService>,
    user: UserId,
    params: web::Query<FeedParams>,
) -> Result<HttpResponse> {
    let query = FeedQuery {
        keyword: params.q.clone(),
        date: params.date.clone(),
        limit: params.limit,
        offset: params.offset,
    };

    let posts = service.compose_feed(user.0, &query).await?;
    Ok(HttpResponse::Ok().json(posts))
}
