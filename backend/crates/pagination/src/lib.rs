//! Pagination envelope primitives shared by list endpoints.
//!
//! List queries use a 1-based page number and a bounded page size. The
//! envelope keeps the total row count so callers can derive the number of
//! pages without a second query.

use serde::{Deserialize, Serialize};

/// Largest page size a caller may request.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Page size applied when the caller does not supply one.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Errors raised when constructing a [`PageRequest`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PageRequestError {
    /// Page numbers are 1-based; zero is not a valid page.
    #[error("page number must be at least 1")]
    ZeroPageNumber,
    /// The page size is zero or exceeds [`MAX_PAGE_SIZE`].
    #[error("page size must be between 1 and {MAX_PAGE_SIZE}, got {got}")]
    PageSizeOutOfRange {
        /// The rejected size.
        got: u32,
    },
}

/// A validated page window: 1-based page number plus page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    number: u32,
    size: u32,
}

impl PageRequest {
    /// Build a page request, validating both components.
    pub fn new(number: u32, size: u32) -> Result<Self, PageRequestError> {
        if number == 0 {
            return Err(PageRequestError::ZeroPageNumber);
        }
        if size == 0 || size > MAX_PAGE_SIZE {
            return Err(PageRequestError::PageSizeOutOfRange { got: size });
        }
        Ok(Self { number, size })
    }

    /// 1-based page number.
    #[must_use]
    pub fn number(&self) -> u32 {
        self.number
    }

    /// Number of items per page.
    #[must_use]
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Row offset of the first item on this page.
    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.number - 1) * u64::from(self.size)
    }

    /// Row limit for this page.
    #[must_use]
    pub fn limit(&self) -> u64 {
        u64::from(self.size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            number: 1,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Sort direction accepted by list endpoints.
///
/// Parsing is lenient: `asc`/`desc` in any case, with anything else
/// rejected so callers can fall back to their default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Ascending order (the default).
    #[default]
    Asc,
    /// Descending order.
    Desc,
}

impl SortOrder {
    /// Parse a direction, returning `None` for unrecognised input.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.to_ascii_lowercase().as_str() {
            "asc" => Some(Self::Asc),
            "desc" => Some(Self::Desc),
            _ => None,
        }
    }

    /// Canonical lowercase name, as embedded in cache keys.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// One page of results together with the total row count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagedResult<T> {
    /// Items on this page, at most `page_size` of them.
    pub items: Vec<T>,
    /// Total number of rows matching the query across all pages.
    pub total_count: u64,
    /// 1-based page number this envelope holds.
    pub page_number: u32,
    /// Requested page size.
    pub page_size: u32,
}

impl<T> PagedResult<T> {
    /// Assemble an envelope from a page of items and the total count.
    pub fn new(items: Vec<T>, total_count: u64, page: PageRequest) -> Self {
        Self {
            items,
            total_count,
            page_number: page.number(),
            page_size: page.size(),
        }
    }

    /// Total number of pages, derived from the count and page size.
    #[must_use]
    pub fn total_pages(&self) -> u64 {
        if self.total_count == 0 {
            0
        } else {
            self.total_count.div_ceil(u64::from(self.page_size))
        }
    }

    /// Map the items while keeping the envelope metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PagedResult<U> {
        PagedResult {
            items: self.items.into_iter().map(f).collect(),
            total_count: self.total_count,
            page_number: self.page_number,
            page_size: self.page_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn default_page_request_is_first_page() {
        let page = PageRequest::default();
        assert_eq!(page.number(), 1);
        assert_eq!(page.size(), DEFAULT_PAGE_SIZE);
        assert_eq!(page.offset(), 0);
    }

    #[rstest]
    #[case(1, 10, 0)]
    #[case(2, 10, 10)]
    #[case(3, 25, 50)]
    fn offset_is_zero_based(#[case] number: u32, #[case] size: u32, #[case] expected: u64) {
        let page = PageRequest::new(number, size).expect("valid page");
        assert_eq!(page.offset(), expected);
    }

    #[rstest]
    fn zero_page_number_is_rejected() {
        assert_eq!(
            PageRequest::new(0, 10),
            Err(PageRequestError::ZeroPageNumber)
        );
    }

    #[rstest]
    #[case(0)]
    #[case(MAX_PAGE_SIZE + 1)]
    fn out_of_range_page_size_is_rejected(#[case] size: u32) {
        assert_eq!(
            PageRequest::new(1, size),
            Err(PageRequestError::PageSizeOutOfRange { got: size })
        );
    }

    #[rstest]
    #[case("asc", Some(SortOrder::Asc))]
    #[case("DESC", Some(SortOrder::Desc))]
    #[case("Asc", Some(SortOrder::Asc))]
    #[case("sideways", None)]
    #[case("", None)]
    fn sort_order_parsing(#[case] raw: &str, #[case] expected: Option<SortOrder>) {
        assert_eq!(SortOrder::parse(raw), expected);
    }

    #[rstest]
    #[case(0, 10, 0)]
    #[case(1, 10, 1)]
    #[case(10, 10, 1)]
    #[case(11, 10, 2)]
    #[case(21, 10, 3)]
    fn total_pages_is_derived(#[case] total: u64, #[case] size: u32, #[case] expected: u64) {
        let page = PageRequest::new(1, size).expect("valid page");
        let result: PagedResult<u8> = PagedResult::new(Vec::new(), total, page);
        assert_eq!(result.total_pages(), expected);
    }

    #[rstest]
    fn map_preserves_envelope_metadata() {
        let page = PageRequest::new(2, 5).expect("valid page");
        let result = PagedResult::new(vec![1_u8, 2, 3], 13, page).map(u32::from);
        assert_eq!(result.items, vec![1_u32, 2, 3]);
        assert_eq!(result.total_count, 13);
        assert_eq!(result.page_number, 2);
        assert_eq!(result.page_size, 5);
    }
}
