//! Pagination parameters for the order listing.
//!
//! Either parameter supplied with a non-positive value is rejected;
//! omitted parameters fall back to page 1 with 10 items.

use crate::errors::ServiceError;

pub const INVALID_PAGE_MESSAGE: &str = "Invalid page index or page size.";

/// 1-based page parameters as they arrive from the query string.
#[derive(Clone, Copy, Debug, Default)]
pub struct PageParams {
    pub page_index: Option<i64>,
    pub page_size: Option<i64>,
}

impl PageParams {
    /// Validate and convert to an `(offset, limit)` pair.
    pub fn resolve(self) -> Result<(u64, u64), ServiceError> {
        if self.page_index.is_some_and(|p| p <= 0) || self.page_size.is_some_and(|s| s <= 0) {
            return Err(ServiceError::Validation(INVALID_PAGE_MESSAGE.to_string()));
        }
        let index = self.page_index.unwrap_or(1) as u64;
        let size = self.page_size.unwrap_or(10) as u64;
        // Offsets past u64::MAX cannot address any row.
        let offset = (index - 1)
            .checked_mul(size)
            .ok_or_else(|| ServiceError::Validation(INVALID_PAGE_MESSAGE.to_string()))?;
        Ok((offset, size))
    }
}
