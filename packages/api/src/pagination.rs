// ABOUTME: Pagination for list endpoints
// ABOUTME: `page`/`limit` query parameters and the paginated response body

use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: i64 = 50;
pub const MAX_PAGE_SIZE: i64 = 500;
pub const MIN_PAGE: i64 = 1;
pub const MAX_PAGE: i64 = 1_000_000;

/// Query parameters for pagination (1-indexed pages)
#[derive(Debug, Clone, Deserialize)]
pub struct PaginationParams {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_page() -> i64 {
    MIN_PAGE
}

fn default_limit() -> i64 {
    DEFAULT_PAGE_SIZE
}

impl PaginationParams {
    pub fn with_page_and_limit(page: i64, limit: i64) -> Self {
        Self { page, limit }
    }

    /// Clamped `(limit, offset)` for SQL
    pub fn validate(&self) -> (i64, i64) {
        let limit = self.limit.clamp(1, MAX_PAGE_SIZE);
        (limit, (self.page() - 1).saturating_mul(limit))
    }

    pub fn limit(&self) -> i64 {
        self.validate().0
    }

    pub fn offset(&self) -> i64 {
        self.validate().1
    }

    pub fn page(&self) -> i64 {
        self.page.clamp(MIN_PAGE, MAX_PAGE)
    }
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self::with_page_and_limit(MIN_PAGE, DEFAULT_PAGE_SIZE)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    pub page: i64,
    pub page_size: i64,
    pub total_items: i64,
    pub total_pages: i64,
    pub has_next_page: bool,
    pub has_previous_page: bool,
}

impl PaginationMeta {
    pub fn new(params: &PaginationParams, total_items: i64) -> Self {
        let page = params.page();
        let page_size = params.limit();
        let total_pages = (total_items + page_size - 1) / page_size;

        Self {
            page,
            page_size,
            total_items,
            total_pages,
            has_next_page: page < total_pages,
            has_previous_page: page > MIN_PAGE,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub pagination: PaginationMeta,
}

impl<T> PaginatedResponse<T> {
    pub fn new(data: Vec<T>, params: &PaginationParams, total_items: i64) -> Self {
        Self {
            data,
            pagination: PaginationMeta::new(params, total_items),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = PaginationParams::default();
        assert_eq!(params.page(), 1);
        assert_eq!(params.limit(), DEFAULT_PAGE_SIZE);
        assert_eq!(params.offset(), 0);
    }

    #[test]
    fn test_out_of_range_values_are_clamped() {
        let params = PaginationParams::with_page_and_limit(0, 10_000);
        assert_eq!(params.page(), 1);
        assert_eq!(params.limit(), MAX_PAGE_SIZE);

        let params = PaginationParams::with_page_and_limit(3, -1);
        assert_eq!(params.limit(), 1);
        assert_eq!(params.offset(), 2);
    }

    #[test]
    fn test_huge_page_does_not_overflow() {
        let params = PaginationParams::with_page_and_limit(i64::MAX, MAX_PAGE_SIZE);
        assert_eq!(params.page(), MAX_PAGE);
        assert_eq!(params.offset(), (MAX_PAGE - 1) * MAX_PAGE_SIZE);

        let meta = PaginationMeta::new(&params, 3);
        assert!(!meta.has_next_page);
        assert!(meta.has_previous_page);
    }

    #[test]
    fn test_meta_for_middle_page() {
        let params = PaginationParams::with_page_and_limit(2, 25);
        let meta = PaginationMeta::new(&params, 60);

        assert_eq!(meta.total_pages, 3);
        assert!(meta.has_next_page);
        assert!(meta.has_previous_page);
    }

    #[test]
    fn test_meta_for_empty_result() {
        let meta = PaginationMeta::new(&PaginationParams::default(), 0);
        assert_eq!(meta.total_pages, 0);
        assert!(!meta.has_next_page);
        assert!(!meta.has_previous_page);
    }

    #[test]
    fn test_meta_serializes_camel_case() {
        let meta = PaginationMeta::new(&PaginationParams::default(), 1);
        let json = serde_json::to_value(&meta).unwrap();
        assert_eq!(json["totalItems"], 1);
        assert_eq!(json["hasNextPage"], false);
    }
}
