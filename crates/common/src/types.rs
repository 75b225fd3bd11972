//! Paging types shared by the store and the API.

use serde::{Deserialize, Serialize};

/// Upper bound on `per_page` accepted from callers.
pub const MAX_PER_PAGE: u32 = 100;

/// Default page size when the caller does not ask for one.
pub const DEFAULT_PER_PAGE: u32 = 20;

/// A 1-based page request.
///
/// Values outside the accepted range are clamped rather than rejected, so a
/// request for page 0 reads the first page and an oversized `per_page` is
/// capped at [`MAX_PER_PAGE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: u32,
    pub per_page: u32,
}

impl PageRequest {
    /// Creates a page request, clamping both values into range.
    pub fn new(page: u32, per_page: u32) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.clamp(1, MAX_PER_PAGE),
        }
    }

    /// Number of rows to skip.
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.per_page)
    }

    /// Number of rows to fetch.
    pub fn limit(&self) -> u64 {
        u64::from(self.per_page)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(1, DEFAULT_PER_PAGE)
    }
}

/// One page of results plus the total row count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub per_page: u32,
    pub total: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, request: PageRequest, total: u64) -> Self {
        Self {
            items,
            page: request.page,
            per_page: request.per_page,
            total,
        }
    }

    /// Total number of pages, at least 1.
    pub fn total_pages(&self) -> u64 {
        let per_page = u64::from(self.per_page.max(1));
        self.total.div_ceil(per_page).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_request_clamps_out_of_range_values() {
        let req = PageRequest::new(0, 1_000);
        assert_eq!(req.page, 1);
        assert_eq!(req.per_page, MAX_PER_PAGE);

        let req = PageRequest::new(3, 0);
        assert_eq!(req.per_page, 1);
    }

    #[test]
    fn page_request_offset_and_limit() {
        let req = PageRequest::new(3, 25);
        assert_eq!(req.offset(), 50);
        assert_eq!(req.limit(), 25);
        assert_eq!(PageRequest::default().offset(), 0);
    }

    #[test]
    fn page_total_pages_rounds_up() {
        let page: Page<u8> = Page::new(vec![], PageRequest::new(1, 10), 21);
        assert_eq!(page.total_pages(), 3);

        let empty: Page<u8> = Page::new(vec![], PageRequest::new(1, 10), 0);
        assert_eq!(empty.total_pages(), 1);
    }

    #[test]
    fn page_request_deserializes_from_json() {
        let req: PageRequest = serde_json::from_str(r#"{"page":2,"per_page":5}"#).unwrap();
        assert_eq!(req, PageRequest::new(2, 5));
    }
}
