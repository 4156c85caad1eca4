//! Pagination metadata for list endpoints.

use serde::Serialize;

/// One page of results plus the numbers needed to walk the rest
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Total number of matching records
    pub total: u64,
    /// 1-based page number, `skip / limit + 1`
    pub page: u64,
    /// Requested page size
    pub size: u64,
    /// `ceil(total / limit)`
    pub pages: u64,
}

impl<T> Page<T> {
    /// Wraps `items` fetched with `skip`/`limit` out of `total` records.
    #[must_use]
    pub fn new(items: Vec<T>, total: u64, skip: u64, limit: u64) -> Self {
        let limit = limit.max(1);
        Self {
            items,
            total,
            page: skip / limit + 1,
            size: limit,
            pages: total.div_ceil(limit),
        }
    }
}
