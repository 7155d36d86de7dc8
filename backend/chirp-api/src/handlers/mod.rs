pub mod auth;
pub mod comments;
pub mod feed;
pub mod follows;
pub mod health;
pub mod likes;
pub mod notifications;
pub mod posts;
pub mod users;

use serde::Deserialize;

/// Common limit/offset query parameters
#[derive(Debug, Deserialize)]
pub struct PaginationParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl PaginationParams {
    /// Clamp to sane bounds: limit 1..=200 (default 50), offset >= 0
    pub fn clamped(&self) -> (i64, i64) {
        let limit = self.limit.unwrap_or(50).clamp(1, 200);
        let offset = self.offset.unwrap_or(0).max(0);
        (limit, offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_defaults_and_bounds() {
        let params = PaginationParams {
            limit: None,
            offset: None,
        };
        assert_eq!(params.clamped(), (50, 0));

        let params = PaginationParams {
            limit: Some(10_000),
            offset: Some(-5),
        };
        assert_eq!(params.clamped(), (200, 0));

        let params = PaginationParams {
            limit: Some(0),
            offset: Some(30),
        };
        assert_eq!(params.clamped(), (1, 30));
    }
}
