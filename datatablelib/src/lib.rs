//! # datatablelib
//!
//! A headless data-table pipeline: filter, sort and paginate a list of
//! JSON rows, with column visibility, row selection, export and print.
//!
//! ## Overview
//!
//! The library holds no rendering code. It derives, from a dataset and an
//! explicit view state, the rows that should be displayed:
//!
//! - **Filter**: case-insensitive substring match over the visible columns
//! - **Sort**: stable, type-aware comparison (dates, numbers, natural text)
//! - **Paginate**: fixed-size windows with clamped page numbers
//!
//! Around the pipeline sit the stateful pieces a table needs:
//!
//! - **Column visibility**: toggles persisted per identifier via a `SnapshotStore`
//! - **Selection**: row keys that survive filtering, sorting and paging
//! - **Debounced search**: typed queries applied after a quiet period
//! - **Events**: notifications drained by the owning context
//!
//! ## Features
//!
//! - **Delegated mode**: hand filtering, sorting and paging to a backend
//! - **Export**: raw values keyed by caption, written as .xlsx or JSON
//! - **Print**: a standalone HTML document of the printable columns
//! - **Pure derivation**: rows are never mutated; every change recomputes
//!
//! ## Example
//!
//! ```rust
//! use datatablelib::{Column, Row, RowKeySource, TableConfig, TableView};
//! use serde_json::json;
//!
//! let rows: Vec<Row> = vec![
//!     json!({"id": 1, "name": "Bob", "price": "$12"}),
//!     json!({"id": 2, "name": "ann", "price": "$3.50"}),
//!     json!({"id": 3, "name": "Cy", "price": "$7"}),
//! ]
//! .into_iter()
//! .filter_map(|v| v.as_object().cloned())
//! .collect();
//!
//! let columns = vec![Column::new("name", "Name"), Column::new("price", "Price")];
//! let mut view = TableView::new(
//!     columns,
//!     TableConfig::new().page_size(2),
//!     RowKeySource::field("id"),
//! );
//! view.set_rows(rows);
//!
//! // Sort numerically by price
//! view.toggle_sort("price");
//! let names: Vec<&str> = view
//!     .page_rows()
//!     .iter()
//!     .filter_map(|r| r.get("name").and_then(|v| v.as_str()))
//!     .collect();
//! assert_eq!(names, vec!["ann", "Cy"]);
//! assert_eq!(view.total_pages(), 2);
//!
//! // Queries are debounced; flush applies the pending one now
//! view.input_query("BOB", std::time::Instant::now());
//! view.flush_query();
//! assert_eq!(view.filtered_len(), 1);
//! ```

pub mod data;
pub mod error;
pub mod output;
pub mod query;
pub mod state;
pub mod view;

pub use data::{Align, CellFormatter, Column, KeyResolver, Row, RowKey, RowKeySource};
pub use error::DataTableError;
pub use output::{
    ExportSheet, HtmlFileSurface, HtmlWriterSurface, JsonWriter, Outcome, PageInfo,
    Presentation, PrintDocument, PrintSurface, SpreadsheetWriter, XlsxWriter,
};
pub use query::{RowSet, SortDirection, SortState, TableConfig};
pub use state::{Debouncer, FileStore, MemoryStore, Selection, SnapshotStore, TableEvent};
pub use view::TableView;

/// Result type for datatablelib operations
pub type Result<T> = std::result::Result<T, DataTableError>;
