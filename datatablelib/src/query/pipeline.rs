//! Row set: the derived view of a dataset.
//!
//! A RowSet sits between the raw rows and the presentation layer. It
//! represents data that has been:
//! - Filtered by the search query across visible columns
//! - Sorted by the active sort column
//! - Windowed to the current page
//!
//! Derivation is pure: the same rows and parameters always produce the
//! same RowSet, so the view recomputes from scratch after every change.

use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::data::{Column, Row};

use super::filter::filter_rows;
use super::options::SortDirection;
use super::paginate::{clamp_page, page_bounds, total_pages};
use super::sort::sort_rows;

/// Parameters for one derivation.
#[derive(Debug, Clone, Copy)]
pub struct Derivation<'a> {
    /// Columns searched by the query
    pub search_columns: &'a [&'a Column],
    pub query: &'a str,
    pub sort_column: Option<&'a Column>,
    pub direction: SortDirection,
    pub page: usize,
    pub page_size: usize,
    /// Window to a page; otherwise every ordered row is shown
    pub paginate: bool,
    /// Owner already filtered, sorted and paged the rows
    pub delegated: bool,
}

/// Derived row indices for the current view state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowSet {
    /// Filtered and sorted indices into the source rows
    pub ordered: Vec<usize>,
    /// Range of `ordered` shown on the current page
    pub window: Range<usize>,
    /// Page the window was computed for, after clamping
    pub page: usize,
    pub total_pages: usize,
}

impl RowSet {
    /// Run filter, sort and paginate over `rows`.
    ///
    /// In delegated mode every stage passes through. The requested page is
    /// clamped into range before windowing.
    pub fn derive(rows: &[Row], params: Derivation<'_>) -> Self {
        let all = || (0..rows.len()).collect::<Vec<_>>();

        if params.delegated {
            let ordered = all();
            let window = 0..ordered.len();
            return RowSet {
                ordered,
                window,
                page: params.page.max(1),
                total_pages: 1,
            };
        }

        let filtered = filter_rows(rows, params.query, params.search_columns);
        let ordered = sort_rows(rows, &filtered, params.sort_column, params.direction);

        let count = ordered.len();
        let pages = total_pages(count, params.page_size);
        let page = clamp_page(params.page, count, params.page_size);
        let window = if params.paginate {
            page_bounds(page, params.page_size, count)
        } else {
            0..count
        };

        tracing::debug!(
            rows = rows.len(),
            filtered = count,
            page,
            pages,
            "derived row set"
        );

        RowSet {
            ordered,
            window,
            page,
            total_pages: pages,
        }
    }

    /// Indices of rows on the current page.
    pub fn page_indices(&self) -> &[usize] {
        &self.ordered[self.window.clone()]
    }

    /// Number of rows that survived filtering.
    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }
}
