//! Core data types: rows, columns and row identity.
//!
//! This module contains the dataset-facing types the pipeline operates on:
//!
//! - **Row**: an open JSON object with dot-path cell access
//! - **Column**: schema entry with display, sort and print flags
//! - **RowKey**: stable identifier used by selection

pub mod column;
pub mod key;
pub mod row;

pub use column::{Align, CellFormatter, Column};
pub use key::{KeyResolver, RowKey, RowKeySource};
pub use row::{cell_text, is_absent, resolve, Row};
