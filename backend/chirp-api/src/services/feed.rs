use chrono::{DateTime, Days, NaiveDate, NaiveTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::debug;
use uuid::Uuid;

use crate::db::follow_repo;
use crate::error::{AppError, Result};
use crate::models::PostView;

/// Optional feed refinements, straight from the query string.
#[derive(Debug, Clone, Default)]
pub struct FeedQuery {
    /// Case-insensitive substring over post content or author username.
    pub keyword: Option<String>,
    /// Calendar date, YYYY-MM-DD.
    pub date: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Composes the personalized timeline: posts by followed authors, newest
/// first, optionally refined by keyword and calendar date.
#[derive(Clone)]
pub struct FeedService {
    pool: PgPool,
    strict_date_filter: bool,
}

impl FeedService {
    pub fn new(pool: PgPool, strict_date_filter: bool) -> Self {
        Self {
            pool,
            strict_date_filter,
        }
    }

    pub async fn compose_feed(&self, viewer_id: Uuid, query: &FeedQuery) -> Result<Vec<PostView>> {
        let followees = follow_repo::followee_ids(&self.pool, viewer_id).await?;

        // Following nobody means an empty feed, not an error.
        if followees.is_empty() {
            return Ok(Vec::new());
        }

        let date = resolve_date_filter(query.date.as_deref(), self.strict_date_filter)?;

        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(
            r#"
            SELECT p.id, p.author_id, u.username AS author_username, p.content, p.media_url,
                   (SELECT COUNT(*) FROM likes l WHERE l.post_id = p.id) AS likes_count,
                   (SELECT COUNT(*) FROM comments c WHERE c.post_id = p.id) AS comments_count,
                   p.created_at, p.updated_at
            FROM posts p
            JOIN users u ON u.id = p.author_id
            WHERE p.author_id = ANY("#,
        );
        qb.push_bind(followees);
        qb.push(")");

        // One row per post by construction, so a post matching on both
        // content and username is still returned once.
        if let Some(keyword) = query.keyword.as_deref().map(str::trim).filter(|k| !k.is_empty()) {
            let pattern = ilike_pattern(keyword);
            qb.push(" AND (p.content ILIKE ");
            qb.push_bind(pattern.clone());
            qb.push(" OR u.username ILIKE ");
            qb.push_bind(pattern);
            qb.push(")");
        }

        if let Some(date) = date {
            let (start, end) = day_bounds(date)?;
            qb.push(" AND p.created_at >= ");
            qb.push_bind(start);
            qb.push(" AND p.created_at < ");
            qb.push_bind(end);
        }

        qb.push(" ORDER BY p.created_at DESC");

        if let Some(limit) = query.limit {
            qb.push(" LIMIT ");
            qb.push_bind(limit.max(0));
        }
        if let Some(offset) = query.offset {
            qb.push(" OFFSET ");
            qb.push_bind(offset.max(0));
        }

        let posts = qb.build_query_as::<PostView>().fetch_all(&self.pool).await?;
        Ok(posts)
    }

}

/// Resolve the optional date filter under the configured policy: lenient
/// mode drops an unparsable value, strict mode rejects it.
fn resolve_date_filter(raw: Option<&str>, strict: bool) -> Result<Option<NaiveDate>> {
    let Some(raw) = raw.map(str::trim).filter(|d| !d.is_empty()) else {
        return Ok(None);
    };

    match parse_feed_date(raw) {
        Some(date) => Ok(Some(date)),
        None if strict => Err(AppError::Validation(format!(
            "invalid date filter '{}', expected YYYY-MM-DD",
            raw
        ))),
        None => {
            debug!(date = raw, "ignoring unparsable feed date filter");
            Ok(None)
        }
    }
}

/// Parse a YYYY-MM-DD calendar date; None for anything unparsable.
pub fn parse_feed_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

/// Half-open UTC timestamp range covering one calendar day.
fn day_bounds(date: NaiveDate) -> Result<(DateTime<Utc>, DateTime<Utc>)> {
    let next = date
        .checked_add_days(Days::new(1))
        .ok_or_else(|| AppError::Validation("date filter out of range".to_string()))?;

    let start = date.and_time(NaiveTime::MIN).and_utc();
    let end = next.and_time(NaiveTime::MIN).and_utc();
    Ok((start, end))
}

/// Wrap a keyword in ILIKE wildcards, escaping any the user supplied.
pub fn ilike_pattern(keyword: &str) -> String {
    let escaped = keyword
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_date_parses() {
        assert_eq!(
            parse_feed_date("2024-02-29"),
            NaiveDate::from_ymd_opt(2024, 2, 29)
        );
        assert_eq!(
            parse_feed_date(" 2023-01-05 "),
            NaiveDate::from_ymd_opt(2023, 1, 5)
        );
    }

    #[test]
    fn malformed_date_is_none() {
        assert_eq!(parse_feed_date("2023-13-99"), None);
        assert_eq!(parse_feed_date("yesterday"), None);
        assert_eq!(parse_feed_date("2023/01/05"), None);
        assert_eq!(parse_feed_date(""), None);
    }

    #[test]
    fn day_bounds_cover_one_day() {
        let date = NaiveDate::from_ymd_opt(2023, 6, 15).unwrap();
        let (start, end) = day_bounds(date).unwrap();
        assert_eq!(start.to_rfc3339(), "2023-06-15T00:00:00+00:00");
        assert_eq!(end.to_rfc3339(), "2023-06-16T00:00:00+00:00");
    }

    #[test]
    fn lenient_mode_drops_a_bad_date() {
        assert_eq!(resolve_date_filter(Some("2023-13-99"), false).unwrap(), None);
        assert_eq!(
            resolve_date_filter(Some("2023-06-15"), false).unwrap(),
            NaiveDate::from_ymd_opt(2023, 6, 15)
        );
        assert_eq!(resolve_date_filter(None, false).unwrap(), None);
        assert_eq!(resolve_date_filter(Some("  "), true).unwrap(), None);
    }

    #[test]
    fn strict_mode_rejects_a_bad_date() {
        assert!(matches!(
            resolve_date_filter(Some("2023-13-99"), true),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn ilike_pattern_escapes_wildcards() {
        assert_eq!(ilike_pattern("hello"), "%hello%");
        assert_eq!(ilike_pattern("50%_off"), "%50\\%\\_off%");
        assert_eq!(ilike_pattern("back\\slash"), "%back\\\\slash%");
    }
}
