//! List filtering and pagination engine
//!
//! Pure functions over in-memory slices. Every table in the client is
//! rendered from a filtered snapshot run through [`paginate`]; the page
//! cursor itself lives in the calling manager, never in module state.

use serde::{Deserialize, Serialize};

/// Pagination metadata for a windowed list view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// Current page, clamped into `1..=total_pages`
    pub page: usize,
    pub per_page: usize,
    pub total: usize,
    /// Never zero; an empty list still renders page 1 of 1
    pub total_pages: usize,
}

impl Pagination {
    /// Compute metadata for a requested page, clamping it into range.
    pub fn new(page: usize, per_page: usize, total: usize) -> Self {
        let per_page = per_page.max(1);
        let total_pages = total.div_ceil(per_page).max(1);
        Self {
            page: page.clamp(1, total_pages),
            per_page,
            total,
            total_pages,
        }
    }
}

/// One page of a list plus its metadata
#[derive(Debug, Clone)]
pub struct Page<'a, T> {
    pub items: &'a [T],
    pub pagination: Pagination,
}

/// Slice out the requested page. Out-of-range pages are clamped, so
/// page 0 yields the first page and anything past the end yields the
/// last page.
pub fn paginate<T>(items: &[T], page: usize, per_page: usize) -> Page<'_, T> {
    let pagination = Pagination::new(page, per_page, items.len());
    let start = (pagination.page - 1) * pagination.per_page;
    let end = (start + pagination.per_page).min(items.len());
    let items = if start >= items.len() {
        &items[0..0]
    } else {
        &items[start..end]
    };
    Page { items, pagination }
}

/// A pagination control element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageButton {
    Page(usize),
    Ellipsis,
}

/// Build the bounded page-button row: a window of up to `max_buttons`
/// numbered buttons around the current page, with the first and last
/// page (plus ellipsis markers) added when the window does not reach
/// them.
pub fn page_window(current: usize, total_pages: usize, max_buttons: usize) -> Vec<PageButton> {
    let max_buttons = max_buttons.max(1);
    let total_pages = total_pages.max(1);
    let current = current.clamp(1, total_pages);

    let mut start = current.saturating_sub(max_buttons / 2).max(1);
    let end = (start + max_buttons - 1).min(total_pages);
    start = end.saturating_sub(max_buttons - 1).max(1);

    let mut buttons = Vec::new();
    if start > 1 {
        buttons.push(PageButton::Page(1));
        if start > 2 {
            buttons.push(PageButton::Ellipsis);
        }
    }
    buttons.extend((start..=end).map(PageButton::Page));
    if end < total_pages {
        if end < total_pages - 1 {
            buttons.push(PageButton::Ellipsis);
        }
        buttons.push(PageButton::Page(total_pages));
    }
    buttons
}

/// Case-insensitive substring match across a set of candidate fields.
/// A blank term matches everything.
pub fn matches_search(term: &str, fields: &[&str]) -> bool {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return true;
    }
    fields
        .iter()
        .any(|field| field.to_lowercase().contains(&term))
}
