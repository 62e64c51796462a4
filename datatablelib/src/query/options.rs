//! Configuration types for the table pipeline.
//!
//! This module contains the options that control which stages run, how
//! they behave, and which interactive controls exist.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Ascending (A-Z, smallest first)
    #[default]
    Ascending,
    /// Descending (Z-A, largest first)
    Descending,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    pub fn is_ascending(self) -> bool {
        self == SortDirection::Ascending
    }

    /// Arrow shown next to a sorted header.
    pub fn arrow(self) -> &'static str {
        match self {
            SortDirection::Ascending => "▲",
            SortDirection::Descending => "▼",
        }
    }

    /// Apply the direction to an ascending comparison result.
    pub fn apply(self, ordering: std::cmp::Ordering) -> std::cmp::Ordering {
        match self {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortDirection::Ascending),
            "desc" | "descending" => Ok(SortDirection::Descending),
            _ => Err(format!("Unknown sort direction: {}", s)),
        }
    }
}

/// Active sort column and direction.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SortState {
    /// Column key; `None` leaves the filtered order untouched
    pub key: Option<String>,
    pub direction: SortDirection,
}

impl SortState {
    pub fn by(key: impl Into<String>) -> Self {
        Self {
            key: Some(key.into()),
            direction: SortDirection::Ascending,
        }
    }

    /// Set sort direction to ascending
    pub fn ascending(mut self) -> Self {
        self.direction = SortDirection::Ascending;
        self
    }

    /// Set sort direction to descending
    pub fn descending(mut self) -> Self {
        self.direction = SortDirection::Descending;
        self
    }
}

/// Table configuration supplied by the owning context.
///
/// `show_*` flags describe which controls exist: an operation whose
/// control is switched off is ignored. `delegated` hands filtering,
/// sorting and paging to the owner; the pipeline then only relays intent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    pub show_search: bool,
    pub show_pagination: bool,
    pub show_export: bool,
    pub show_print: bool,
    pub show_columns_toggle: bool,
    pub show_row_numbers: bool,
    /// Filtering, sorting and paging happen outside the pipeline
    pub delegated: bool,
    pub page_size: usize,
    /// Page sizes offered to users
    pub page_size_choices: Vec<usize>,
    /// Quiet period before a typed query is applied
    pub debounce_ms: u64,
    /// Namespace for the persisted column-visibility snapshot
    pub persistence_id: Option<String>,
    /// Export only the visible columns instead of every column
    pub export_visible_only: bool,
    pub selectable: bool,
    pub sticky_header: bool,
    pub sticky_first_column: bool,
    pub dense: bool,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            show_search: true,
            show_pagination: true,
            show_export: true,
            show_print: true,
            show_columns_toggle: true,
            show_row_numbers: false,
            delegated: false,
            page_size: 10,
            page_size_choices: vec![10, 25, 50, 100],
            debounce_ms: 250,
            persistence_id: None,
            export_visible_only: false,
            selectable: false,
            sticky_header: false,
            sticky_first_column: false,
            dense: false,
        }
    }
}

impl TableConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Builder: set page size (zero is coerced to one)
    pub fn page_size(mut self, size: usize) -> Self {
        self.page_size = size.max(1);
        self
    }

    pub fn page_size_choices(mut self, choices: Vec<usize>) -> Self {
        self.page_size_choices = choices;
        self
    }

    pub fn debounce_ms(mut self, ms: u64) -> Self {
        self.debounce_ms = ms;
        self
    }

    pub fn persistence_id(mut self, id: impl Into<String>) -> Self {
        self.persistence_id = Some(id.into());
        self
    }

    pub fn delegated(mut self, delegated: bool) -> Self {
        self.delegated = delegated;
        self
    }

    pub fn selectable(mut self, selectable: bool) -> Self {
        self.selectable = selectable;
        self
    }

    pub fn row_numbers(mut self, show: bool) -> Self {
        self.show_row_numbers = show;
        self
    }

    pub fn pagination(mut self, show: bool) -> Self {
        self.show_pagination = show;
        self
    }

    pub fn search(mut self, show: bool) -> Self {
        self.show_search = show;
        self
    }

    pub fn export(mut self, show: bool) -> Self {
        self.show_export = show;
        self
    }

    pub fn print(mut self, show: bool) -> Self {
        self.show_print = show;
        self
    }

    pub fn columns_toggle(mut self, show: bool) -> Self {
        self.show_columns_toggle = show;
        self
    }

    pub fn export_visible_only(mut self, visible_only: bool) -> Self {
        self.export_visible_only = visible_only;
        self
    }

    pub fn sticky_header(mut self, sticky: bool) -> Self {
        self.sticky_header = sticky;
        self
    }

    pub fn sticky_first_column(mut self, sticky: bool) -> Self {
        self.sticky_first_column = sticky;
        self
    }

    pub fn dense(mut self, dense: bool) -> Self {
        self.dense = dense;
        self
    }
}
