//! Pagination helpers shared by the song and verse listings

use serde::{Deserialize, Serialize};

use crate::errors::CatalogError;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_PER_PAGE: i64 = 10;
pub const MAX_PER_PAGE: i64 = 100;

/// A validated page window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub per_page: i64,
}

impl PageRequest {
    /// Validate a page window against `1..` and `1..=max_per_page`
    ///
    /// A page whose row offset does not fit in an `i64` is rejected.
    pub fn new(page: i64, per_page: i64, max_per_page: i64) -> Result<Self, CatalogError> {
        if page < 1 {
            return Err(CatalogError::InvalidPage { page });
        }
        if per_page < 1 || per_page > max_per_page {
            return Err(CatalogError::InvalidPerPage {
                per_page,
                max: max_per_page,
            });
        }
        if (page - 1).checked_mul(per_page).is_none() {
            return Err(CatalogError::InvalidPage { page });
        }
        Ok(Self { page, per_page })
    }

    /// Row offset of the first item on this page
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.per_page)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

/// One page of results plus totals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
    pub total_pages: i64,
}

impl<T> Page<T> {
    pub fn new(data: Vec<T>, total: i64, request: PageRequest) -> Self {
        Self {
            data,
            total,
            page: request.page,
            per_page: request.per_page,
            total_pages: total_pages(total, request.per_page),
        }
    }
}

/// Ceiling division of `total` by `per_page`
pub fn total_pages(total: i64, per_page: i64) -> i64 {
    if per_page <= 0 {
        return 0;
    }
    (total + per_page - 1) / per_page
}
