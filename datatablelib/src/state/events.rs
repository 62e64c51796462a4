//! Notifications emitted to the owning context.

use serde::Serialize;

use crate::data::{Row, RowKey};

/// Something the owner may want to react to.
///
/// Events are fire-and-forget: the view queues them and the owner drains
/// the queue whenever it likes.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TableEvent {
    /// Visible column keys, in header order
    ColumnsChanged { visible: Vec<String> },
    /// Debounced search query
    SearchChanged { query: String },
    /// Path the rows are ordered by: the column's `sort_key` when set,
    /// otherwise its key
    SortChanged { key: String, ascending: bool },
    /// Full selection after the change
    SelectionChanged { selected: Vec<RowKey> },
    PageChanged { page: usize },
    PageSizeChanged { page_size: usize },
    /// A row on the current page was activated (clicked, entered)
    RowActivated { row: Row, index: usize },
}
