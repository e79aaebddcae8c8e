//! Offset pagination for list endpoints.

use serde::{Deserialize, Serialize};

/// Default page size when `limit` is not specified.
pub const DEFAULT_PAGE_SIZE: usize = 50;

/// Maximum allowed page size.
pub const MAX_PAGE_SIZE: usize = 200;

/// Common pagination parameters accepted by list endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageParams {
    pub skip: Option<usize>,
    /// Items per page (default 50, max 200).
    pub limit: Option<usize>,
}

impl PageParams {
    pub fn skip(&self) -> usize {
        self.skip.unwrap_or(0)
    }

    /// Effective page size, clamped to [1, MAX_PAGE_SIZE].
    pub fn limit(&self) -> usize {
        self.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE)
    }
}

/// A page of results plus the total count of the filtered set, so a
/// client can render page controls without a second request.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub total: u64,
    pub skip: usize,
    pub limit: usize,
    pub items: Vec<T>,
}

impl<T> Page<T> {
    pub fn new(total: u64, params: &PageParams, items: Vec<T>) -> Self {
        Self {
            total,
            skip: params.skip(),
            limit: params.limit(),
            items,
        }
    }
}
