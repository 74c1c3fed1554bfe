//! Offset pagination primitives shared by backend list endpoints.
//!
//! The envelope mirrors the wire contract used by every paginated endpoint:
//! a `data` array plus a `pagination` object carrying page arithmetic. Page
//! numbers are 1-based; limits are clamped to a server-side ceiling so a
//! caller can never request an unbounded page.

use serde::{Deserialize, Serialize};

/// First page returned when the caller supplies nothing usable.
pub const DEFAULT_PAGE: u32 = 1;
/// Items per page when the caller supplies nothing usable.
pub const DEFAULT_LIMIT: u32 = 10;
/// Upper bound on items per page.
pub const MAX_LIMIT: u32 = 100;

/// Validated pagination input: a 1-based page and a clamped page size.
///
/// ## Invariants
/// - `page >= 1`
/// - `1 <= limit <= MAX_LIMIT`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

impl PageRequest {
    /// Clamp raw inputs into a valid request.
    ///
    /// Pages below 1 become 1; limits are forced into `1..=MAX_LIMIT`.
    #[must_use]
    pub const fn clamped(page: u32, limit: u32) -> Self {
        let page = if page < 1 { DEFAULT_PAGE } else { page };
        let limit = if limit < 1 {
            1
        } else if limit > MAX_LIMIT {
            MAX_LIMIT
        } else {
            limit
        };
        Self { page, limit }
    }

    /// 1-based page number.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Items per page.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Rows to skip before the first item of this page.
    #[must_use]
    pub const fn offset(&self) -> i64 {
        ((self.page - 1) as i64) * (self.limit as i64)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::clamped(DEFAULT_PAGE, DEFAULT_LIMIT)
    }
}

/// Page arithmetic returned alongside every paginated result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    /// 1-based page that was served.
    pub current_page: u32,
    /// Total pages available for the filter, `ceil(total_items / items_per_page)`.
    pub total_pages: u64,
    /// Total items matching the filter across all pages.
    pub total_items: u64,
    /// Page size used to slice the result.
    pub items_per_page: u32,
    /// Whether a later page exists.
    pub has_next_page: bool,
    /// Whether an earlier page exists.
    pub has_prev_page: bool,
}

impl PageMeta {
    /// Compute metadata for a request against a known total.
    #[must_use]
    pub fn new(request: PageRequest, total_items: u64) -> Self {
        let total_pages = total_items.div_ceil(u64::from(request.limit));
        Self {
            current_page: request.page,
            total_pages,
            total_items,
            items_per_page: request.limit,
            has_next_page: u64::from(request.page) < total_pages,
            has_prev_page: request.page > 1,
        }
    }
}

/// One page of results plus its pagination metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Items on this page, at most `items_per_page` of them.
    pub data: Vec<T>,
    /// Page arithmetic for the full filtered set.
    pub pagination: PageMeta,
}

impl<T> Page<T> {
    /// Assemble a page from already-sliced items and a total count.
    #[must_use]
    pub fn new(data: Vec<T>, request: PageRequest, total_items: u64) -> Self {
        Self {
            data,
            pagination: PageMeta::new(request, total_items),
        }
    }

    /// The empty page reported when a filter is known to match nothing.
    ///
    /// Carries zero totals so `total_pages` is 0 regardless of the requested
    /// page number.
    #[must_use]
    pub fn empty(request: PageRequest) -> Self {
        Self::new(Vec::new(), request, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, 0, 1, 1)]
    #[case(1, 10, 1, 10)]
    #[case(3, 250, 3, MAX_LIMIT)]
    #[case(7, 100, 7, 100)]
    fn clamping(
        #[case] page: u32,
        #[case] limit: u32,
        #[case] expected_page: u32,
        #[case] expected_limit: u32,
    ) {
        let request = PageRequest::clamped(page, limit);
        assert_eq!(request.page(), expected_page);
        assert_eq!(request.limit(), expected_limit);
    }

    #[rstest]
    #[case(1, 10, 0)]
    #[case(2, 10, 10)]
    #[case(5, 25, 100)]
    fn offsets(#[case] page: u32, #[case] limit: u32, #[case] expected: i64) {
        assert_eq!(PageRequest::clamped(page, limit).offset(), expected);
    }

    #[rstest]
    #[case(1, 10, 0, 0, false, false)]
    #[case(1, 10, 25, 3, true, false)]
    #[case(3, 10, 25, 3, false, true)]
    #[case(2, 10, 30, 3, true, true)]
    #[case(1, 10, 10, 1, false, false)]
    fn page_arithmetic(
        #[case] page: u32,
        #[case] limit: u32,
        #[case] total: u64,
        #[case] expected_pages: u64,
        #[case] has_next: bool,
        #[case] has_prev: bool,
    ) {
        let meta = PageMeta::new(PageRequest::clamped(page, limit), total);
        assert_eq!(meta.total_pages, expected_pages);
        assert_eq!(meta.total_items, total);
        assert_eq!(meta.has_next_page, has_next);
        assert_eq!(meta.has_prev_page, has_prev);
    }

    #[test]
    fn empty_page_reports_zero_pages() {
        let page = Page::<u8>::empty(PageRequest::clamped(4, 10));
        assert!(page.data.is_empty());
        assert_eq!(page.pagination.current_page, 4);
        assert_eq!(page.pagination.total_pages, 0);
        assert!(!page.pagination.has_next_page);
        assert!(page.pagination.has_prev_page);
    }

    #[test]
    fn meta_serialises_camel_case() {
        let meta = PageMeta::new(PageRequest::default(), 25);
        let value = serde_json::to_value(meta).expect("meta json");
        assert_eq!(value["currentPage"], 1);
        assert_eq!(value["totalPages"], 3);
        assert_eq!(value["totalItems"], 25);
        assert_eq!(value["itemsPerPage"], 10);
        assert_eq!(value["hasNextPage"], true);
        assert_eq!(value["hasPrevPage"], false);
    }
}
