//! Pagination stage: page arithmetic and page windows.
//!
//! Pages are 1-based. There is always at least one page, even for an empty
//! result set.

use std::ops::Range;

/// Number of pages needed for `count` items, never less than one.
pub fn total_pages(count: usize, page_size: usize) -> usize {
    let size = page_size.max(1);
    count.div_ceil(size).max(1)
}

/// Clamp `page` into `[1, total_pages]`.
pub fn clamp_page(page: usize, count: usize, page_size: usize) -> usize {
    page.clamp(1, total_pages(count, page_size))
}

/// Index range of `page` within a sequence of `len` items.
///
/// Pages past the end yield an empty range.
pub fn page_bounds(page: usize, page_size: usize, len: usize) -> Range<usize> {
    let size = page_size.max(1);
    let start = page.saturating_sub(1).saturating_mul(size).min(len);
    let end = start.saturating_add(size).min(len);
    start..end
}

/// Slice of `items` shown on `page`.
pub fn page_window<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
    &items[page_bounds(page, page_size, items.len())]
}
