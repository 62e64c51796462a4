//! Query processing: filter, sort, and paginate rows.
//!
//! This module turns raw rows plus view state into a derived row set. It
//! provides:
//!
//! - **Options**: Configuration for the pipeline (`TableConfig`, `SortState`)
//! - **Stages**: `filter`, `sort` and `paginate`, each a pure function
//! - **RowSet**: The result of running all three stages
//!
//! ## Example
//!
//! ```rust
//! use datatablelib::query::{Derivation, RowSet, SortDirection};
//! use datatablelib::{Column, Row};
//! use serde_json::json;
//!
//! let rows: Vec<Row> = vec![
//!     json!({"name": "Bob"}).as_object().cloned().unwrap(),
//!     json!({"name": "ann"}).as_object().cloned().unwrap(),
//! ];
//! let name = Column::new("name", "Name");
//! let set = RowSet::derive(
//!     &rows,
//!     Derivation {
//!         search_columns: &[&name],
//!         query: "",
//!         sort_column: Some(&name),
//!         direction: SortDirection::Ascending,
//!         page: 1,
//!         page_size: 10,
//!         paginate: true,
//!         delegated: false,
//!     },
//! );
//! assert_eq!(set.page_indices(), &[1, 0]);
//! ```

pub mod filter;
pub mod options;
pub mod paginate;
pub mod pipeline;
pub mod sort;

pub use options::{SortDirection, SortState, TableConfig};
pub use pipeline::{Derivation, RowSet};
