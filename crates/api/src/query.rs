//! Shared query parameter types for API handlers.

use serde::Deserialize;

/// `GET /applications?userId=&userType=`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationListParams {
    pub user_id: Option<String>,
    pub user_type: Option<String>,
}

/// Default and ceiling for `?limit=` on recent-property listings.
pub const DEFAULT_RECENT_LIMIT: i64 = 5;
pub const MAX_RECENT_LIMIT: i64 = 20;

/// `?limit=` for short "recent" listings.
#[derive(Debug, Deserialize)]
pub struct LimitParams {
    pub limit: Option<i64>,
}

impl LimitParams {
    /// Clamp to `1..=MAX_RECENT_LIMIT`, defaulting when absent.
    pub fn clamped(&self) -> i64 {
        self.limit
            .unwrap_or(DEFAULT_RECENT_LIMIT)
            .clamp(1, MAX_RECENT_LIMIT)
    }
}
