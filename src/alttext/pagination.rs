use reqwest::header::HeaderMap;

const CURRENT_PAGE_HEADER: &str = "current-page";
const PAGE_ITEMS_HEADER: &str = "page-items";
const TOTAL_PAGES_HEADER: &str = "total-pages";
const TOTAL_COUNT_HEADER: &str = "total-count";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub current_page: u64,
    pub page_items: u64,
    pub total_pages: u64,
    pub total_count: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            current_page: 1,
            page_items: 20,
            total_pages: 1,
            total_count: 0,
        }
    }
}

impl Pagination {
    /// Missing or non-numeric headers keep their default value.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let defaults = Self::default();
        Self {
            current_page: header_u64(headers, CURRENT_PAGE_HEADER, defaults.current_page),
            page_items: header_u64(headers, PAGE_ITEMS_HEADER, defaults.page_items),
            total_pages: header_u64(headers, TOTAL_PAGES_HEADER, defaults.total_pages),
            total_count: header_u64(headers, TOTAL_COUNT_HEADER, defaults.total_count),
        }
    }
}

fn header_u64(headers: &HeaderMap, name: &str, default: u64) -> u64 {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<u64>().ok())
        .unwrap_or(default)
}

/// One page of results plus the pagination headers that came with it.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}
