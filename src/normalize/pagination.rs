use serde::Serialize;
use serde_json::{Map, Value};

pub(crate) const PAGE_KEYS: &[&str] = &["page", "current_page", "currentPage"];
pub(crate) const PAGE_SIZE_KEYS: &[&str] = &["page_size", "pageSize"];
pub(crate) const TOTAL_ITEMS_KEYS: &[&str] = &["total_items", "totalItems", "total", "count"];
pub(crate) const TOTAL_PAGES_KEYS: &[&str] = &["total_pages", "totalPages"];
pub(crate) const ROOT_TOTAL_KEYS: &[&str] = &["total", "count", "recordsTotal"];

/// Pagination as the backend reported it. Every field is optional; callers
/// bring their own defaults (see [`PaginationDescriptor::resolve`]).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PaginationDescriptor {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub total_pages: Option<u32>,
    pub total_items: Option<u64>,
}

/// Pagination after applying caller defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageState {
    pub page: u32,
    pub page_size: u32,
    pub total_pages: u32,
    /// True when the backend gave no page or item count and `total_pages`
    /// was guessed from how full the current page is.
    pub total_pages_guessed: bool,
}

impl PaginationDescriptor {
    /// Fills in whatever the backend left out.
    ///
    /// If no total can be derived, the page count is only a guess: a page
    /// holding fewer records than the page size is taken to be the last one,
    /// a full page means there is at least one more. Never below 1.
    pub fn resolve(
        &self,
        records_on_page: usize,
        requested_page: u32,
        default_page_size: u32,
    ) -> PageState {
        let page_size = self
            .page_size
            .filter(|s| *s > 0)
            .unwrap_or(default_page_size)
            .max(1);
        let page = self.page.filter(|p| *p > 0).unwrap_or(requested_page).max(1);

        let mut total_pages = self.total_pages.filter(|t| *t > 0);
        if total_pages.is_none() {
            total_pages = self.total_items.map(|items| pages_for(items, page_size));
        }

        let total_pages_guessed = total_pages.is_none();
        let total_pages = total_pages.unwrap_or_else(|| {
            if records_on_page < page_size as usize {
                page
            } else {
                page.saturating_add(1)
            }
        });

        PageState {
            page,
            page_size,
            total_pages: total_pages.max(1),
            total_pages_guessed,
        }
    }
}

pub(crate) fn pages_for(total_items: u64, page_size: u32) -> u32 {
    let pages = total_items.div_ceil(u64::from(page_size.max(1)));
    u32::try_from(pages).unwrap_or(u32::MAX)
}

/// Numbers pass through, numeric strings are parsed, anything non-finite
/// counts as missing.
pub(crate) fn to_finite_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) if !s.trim().is_empty() => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    number.filter(|n| n.is_finite())
}

pub(crate) fn number_at(scope: &Map<String, Value>, keys: &[&str]) -> Option<f64> {
    keys.iter()
        .filter_map(|key| scope.get(*key))
        .find_map(to_finite_number)
}

pub(crate) fn positive_u32(value: Option<f64>) -> Option<u32> {
    value.filter(|v| *v >= 1.0).map(|v| v.floor().min(f64::from(u32::MAX)) as u32)
}

pub(crate) fn non_negative_u64(value: Option<f64>) -> Option<u64> {
    value.filter(|v| *v >= 0.0).map(|v| v.floor() as u64)
}
