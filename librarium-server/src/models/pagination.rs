//! Offset/limit window computation for list endpoints.
//!
//! Invalid input is normalized, never rejected: a bad page falls back
//! to 1, a bad limit falls back to the default.

use serde::Deserialize;

/// Default items per page
const DEFAULT_LIMIT: i64 = 10;

/// Upper bound on items per page; anything above falls back to the
/// default rather than clamping, matching the documented contract
const MAX_LIMIT: i64 = 100;

/// Normalized pagination window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// Page number (1-indexed)
    pub page: i64,
    /// Items per page
    pub limit: i64,
}

impl Pagination {
    /// Normalize raw page/limit values.
    ///
    /// - page defaults to 1; values below 1 become 1
    /// - limit defaults to 10; values outside [1,100] become 10
    pub fn new(page: Option<i64>, limit: Option<i64>) -> Self {
        let page = match page {
            Some(p) if p >= 1 => p,
            _ => 1,
        };
        let limit = match limit {
            Some(l) if (1..=MAX_LIMIT).contains(&l) => l,
            _ => DEFAULT_LIMIT,
        };
        Self { page, limit }
    }

    /// SQL OFFSET value, saturating so an absurd page cannot overflow.
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// Raw query parameters for list endpoints
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaginationParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl From<PaginationParams> for Pagination {
    fn from(params: PaginationParams) -> Self {
        Self::new(params.page, params.limit)
    }
}
