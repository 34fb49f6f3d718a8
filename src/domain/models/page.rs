use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: usize = 20;
pub const MAX_PAGE_SIZE: usize = 100;

/// One-based page coordinates, already sanitized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: usize,
    page_size: usize,
}

impl PageRequest {
    pub fn new(page: usize, page_size: usize) -> Self {
        Self {
            page: page.max(1),
            page_size: page_size.clamp(1, MAX_PAGE_SIZE),
        }
    }

    /// Accept loosely-typed query values, falling back to page 1 and the
    /// default size when a value is missing, non-numeric or out of range.
    pub fn from_query(page: Option<&str>, page_size: Option<&str>) -> Self {
        let page = page
            .and_then(parse_positive)
            .map(|p| p.floor() as usize)
            .unwrap_or(1);
        let page_size = page_size
            .and_then(parse_positive)
            .filter(|s| *s <= MAX_PAGE_SIZE as f64)
            .map(|s| s.floor() as usize)
            .filter(|s| *s > 0)
            .unwrap_or(DEFAULT_PAGE_SIZE);
        Self { page: page.max(1), page_size }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn offset(&self) -> usize {
        (self.page - 1).saturating_mul(self.page_size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(1, DEFAULT_PAGE_SIZE)
    }
}

fn parse_positive(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v > 0.0)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: usize,
    pub page: usize,
    pub page_size: usize,
}

impl<T> Page<T> {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_query_defaults_when_missing() {
        let req = PageRequest::from_query(None, None);
        assert_eq!(req.page(), 1);
        assert_eq!(req.page_size(), DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn from_query_floors_fractional_values() {
        let req = PageRequest::from_query(Some("2.7"), Some("10.9"));
        assert_eq!(req.page(), 2);
        assert_eq!(req.page_size(), 10);
        assert_eq!(req.offset(), 10);
    }

    #[test]
    fn from_query_rejects_out_of_range_values() {
        let req = PageRequest::from_query(Some("0"), Some("101"));
        assert_eq!(req.page(), 1);
        assert_eq!(req.page_size(), DEFAULT_PAGE_SIZE);

        let req = PageRequest::from_query(Some("-3"), Some("abc"));
        assert_eq!(req.page(), 1);
        assert_eq!(req.page_size(), DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn from_query_accepts_max_page_size() {
        let req = PageRequest::from_query(Some("1"), Some("100"));
        assert_eq!(req.page_size(), MAX_PAGE_SIZE);
    }

    #[test]
    fn sub_one_page_size_falls_back_to_default() {
        let req = PageRequest::from_query(None, Some("0.5"));
        assert_eq!(req.page_size(), DEFAULT_PAGE_SIZE);
    }
}
