//! The table view: explicit view state plus its derived rows.
//!
//! `TableView` owns everything that changes while a user works with the
//! table (page, page size, sort, query, visible columns, selection) and
//! the dataset it applies to. Every mutating operation updates the state
//! and then calls `recompute`, which derives the row set from scratch.
//!
//! Notifications for the owning context are queued and drained with
//! [`TableView::drain_events`].

use std::path::Path;
use std::time::Instant;

use crate::data::{Column, Row, RowKey, RowKeySource};
use crate::error::DataTableError;
use crate::output::export::{ExportSheet, SpreadsheetWriter};
use crate::output::print::{PrintDocument, PrintSurface};
use crate::output::table::{Layout, PageInfo, PageSource, Presentation};
use crate::output::Outcome;
use crate::query::paginate::{clamp_page, total_pages};
use crate::query::{Derivation, RowSet, SortState, TableConfig};
use crate::state::{
    compile_patterns, ColumnVisibility, Debouncer, Selection, SnapshotStore, TableEvent,
};
use crate::Result;

/// View state and derived rows for one table.
pub struct TableView {
    columns: Vec<Column>,
    config: TableConfig,
    key_source: RowKeySource,
    rows: Vec<Row>,
    keys: Vec<RowKey>,
    /// Row count reported by the owner in delegated mode
    external_total: Option<usize>,
    page: usize,
    page_size: usize,
    sort: SortState,
    /// Applied (debounced, lower-cased) query
    query: String,
    /// Text as typed
    raw_query: String,
    pending_query: Debouncer<String>,
    visibility: ColumnVisibility,
    selection: Selection,
    store: Option<Box<dyn SnapshotStore>>,
    derived: RowSet,
    events: Vec<TableEvent>,
}

impl TableView {
    pub fn new(columns: Vec<Column>, config: TableConfig, key_source: RowKeySource) -> Self {
        if key_source.is_positional() {
            tracing::warn!("positional row keys change whenever the dataset is replaced");
        }
        let visibility = ColumnVisibility::from_defaults(&columns);
        let page_size = config.page_size.max(1);
        let pending_query = Debouncer::new(config.debounce());

        let mut view = TableView {
            columns,
            config,
            key_source,
            rows: Vec::new(),
            keys: Vec::new(),
            external_total: None,
            page: 1,
            page_size,
            sort: SortState::default(),
            query: String::new(),
            raw_query: String::new(),
            pending_query,
            visibility,
            selection: Selection::new(),
            store: None,
            derived: RowSet::default(),
            events: Vec::new(),
        };
        view.recompute();
        view
    }

    /// Attach a snapshot store and hydrate column visibility from it.
    ///
    /// Without a persistence identifier the store is kept but never read.
    pub fn with_store(mut self, store: impl SnapshotStore + 'static) -> Self {
        if let Some(id) = &self.config.persistence_id {
            let snapshot = match store.load(id) {
                Ok(snapshot) => snapshot,
                Err(e) => {
                    tracing::warn!(id = %id, error = %e, "could not read column snapshot");
                    None
                }
            };
            self.visibility = ColumnVisibility::hydrate(&self.columns, snapshot.as_deref());
        }
        self.store = Some(Box::new(store));
        self.recompute();
        self
    }

    /// Builder: initial sort.
    pub fn sorted_by(mut self, sort: SortState) -> Self {
        self.sort = sort;
        self.recompute();
        self
    }

    // ------------------------------------------------------------------
    // Owner-driven state (no notifications)
    // ------------------------------------------------------------------

    /// Replace the dataset.
    pub fn set_rows(&mut self, rows: Vec<Row>) {
        self.keys = rows
            .iter()
            .enumerate()
            .map(|(i, row)| self.key_source.key_for(row, i))
            .collect();
        self.rows = rows;
        self.recompute();
    }

    /// Total row count known to the owner (delegated mode).
    pub fn set_external_total(&mut self, total: Option<usize>) {
        self.external_total = total;
        self.recompute();
    }

    /// Seed the selection.
    pub fn set_selection(&mut self, keys: impl IntoIterator<Item = RowKey>) {
        self.selection.replace(keys);
    }

    /// Set the sort without toggling or notifying.
    pub fn set_sort(&mut self, sort: SortState) {
        self.sort = sort;
        self.recompute();
    }

    /// Set page and page size from the owner (delegated paging).
    pub fn set_paging(&mut self, page: usize, page_size: usize) {
        self.page = page.max(1);
        self.page_size = page_size.max(1);
        self.recompute();
    }

    // ------------------------------------------------------------------
    // Derivation
    // ------------------------------------------------------------------

    /// Re-derive the row set from the rows and the current state.
    ///
    /// If the result shrank below the current page, the page is clamped to
    /// the new last page and a `PageChanged` event is queued.
    pub fn recompute(&mut self) {
        let search_columns = self.visibility.visible_columns(&self.columns);
        let sort_column = self
            .sort
            .key
            .as_deref()
            .and_then(|key| self.columns.iter().find(|c| c.key == key));

        let derived = RowSet::derive(
            &self.rows,
            Derivation {
                search_columns: &search_columns,
                query: &self.query,
                sort_column,
                direction: self.sort.direction,
                page: self.page,
                page_size: self.page_size,
                paginate: self.config.show_pagination,
                delegated: self.config.delegated,
            },
        );

        let clamped = if self.config.delegated {
            match self.external_total {
                Some(total) => clamp_page(self.page, total, self.page_size),
                None => self.page,
            }
        } else {
            derived.page
        };

        self.derived = derived;
        if clamped != self.page {
            tracing::debug!(from = self.page, to = clamped, "clamping page");
            self.page = clamped;
            self.events.push(TableEvent::PageChanged { page: clamped });
        }
    }

    // ------------------------------------------------------------------
    // Search
    // ------------------------------------------------------------------

    /// Text typed into the search box. Applied after the debounce delay.
    pub fn input_query(&mut self, raw: &str, now: Instant) {
        if !self.config.show_search {
            tracing::debug!("search disabled, ignoring query input");
            return;
        }
        self.raw_query = raw.to_string();
        self.pending_query.schedule(raw.to_lowercase(), now);
    }

    /// Advance the debounce timer. Returns whether a query was applied.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.pending_query.poll(now) {
            Some(query) => {
                self.apply_query(query);
                true
            }
            None => false,
        }
    }

    /// Apply a pending query immediately.
    pub fn flush_query(&mut self) -> bool {
        match self.pending_query.flush() {
            Some(query) => {
                self.apply_query(query);
                true
            }
            None => false,
        }
    }

    /// Instant at which the pending query fires, if any.
    pub fn query_deadline(&self) -> Option<Instant> {
        self.pending_query.deadline()
    }

    fn apply_query(&mut self, query: String) {
        self.query = query.clone();
        self.page = 1;
        self.events.push(TableEvent::SearchChanged { query });
        self.recompute();
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn raw_query(&self) -> &str {
        &self.raw_query
    }

    // ------------------------------------------------------------------
    // Sorting
    // ------------------------------------------------------------------

    /// Header click on `key`.
    ///
    /// The active column flips direction; another sortable column becomes
    /// the sort key, ascending. Returns false for unknown or unsortable
    /// columns. `SortChanged` carries the path rows are ordered by, which
    /// is the column's `sort_key` when it has one.
    pub fn toggle_sort(&mut self, key: &str) -> bool {
        let Some(column) = self.columns.iter().find(|c| c.key == key) else {
            return false;
        };
        if !column.sortable {
            return false;
        }
        let resolved = column.sort_path().to_string();

        if self.sort.key.as_deref() == Some(key) {
            self.sort.direction = self.sort.direction.toggled();
        } else {
            self.sort = SortState::by(key);
        }
        if !self.config.delegated {
            self.page = 1;
        }

        self.events.push(TableEvent::SortChanged {
            key: resolved,
            ascending: self.sort.direction.is_ascending(),
        });
        self.recompute();
        true
    }

    pub fn sort(&self) -> &SortState {
        &self.sort
    }

    // ------------------------------------------------------------------
    // Paging
    // ------------------------------------------------------------------

    /// Move to `page`, clamped into range.
    pub fn go_to_page(&mut self, page: usize) {
        let target = page.clamp(1, self.total_pages());
        if target == self.page {
            return;
        }
        self.page = target;
        self.events.push(TableEvent::PageChanged { page: target });
        self.recompute();
    }

    pub fn next_page(&mut self) {
        self.go_to_page(self.page + 1);
    }

    pub fn prev_page(&mut self) {
        self.go_to_page(self.page.saturating_sub(1));
    }

    /// Change the page size and return to the first page.
    pub fn set_page_size(&mut self, size: usize) {
        let size = size.max(1);
        if !self.config.page_size_choices.is_empty()
            && !self.config.page_size_choices.contains(&size)
        {
            tracing::debug!(size, "page size outside configured choices");
        }
        self.page_size = size;
        self.page = 1;
        self.events.push(TableEvent::PageSizeChanged { page_size: size });
        self.recompute();
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Rows after filtering (or the owner's total when delegated).
    pub fn filtered_len(&self) -> usize {
        if self.config.delegated {
            self.external_total.unwrap_or(self.rows.len())
        } else {
            self.derived.len()
        }
    }

    pub fn total_pages(&self) -> usize {
        if self.config.delegated {
            total_pages(self.filtered_len(), self.page_size)
        } else {
            self.derived.total_pages
        }
    }

    // ------------------------------------------------------------------
    // Column visibility
    // ------------------------------------------------------------------

    /// Show or hide one column. Returns whether it is now visible.
    pub fn toggle_column(&mut self, key: &str) -> Result<bool> {
        if !self.columns.iter().any(|c| c.key == key) {
            return Err(DataTableError::UnknownColumn(key.to_string()));
        }
        if !self.config.show_columns_toggle {
            return Ok(self.visibility.is_visible(key));
        }
        let visible = self.visibility.toggle(key);
        self.columns_changed();
        Ok(visible)
    }

    /// Hide everything when all columns are visible, otherwise show all.
    pub fn toggle_all_columns(&mut self) {
        if !self.config.show_columns_toggle {
            return;
        }
        self.visibility.toggle_all(&self.columns);
        self.columns_changed();
    }

    /// Show exactly the columns whose key matches one of the glob patterns.
    pub fn show_columns_matching(&mut self, patterns: &[&str]) -> Result<()> {
        if !self.config.show_columns_toggle {
            return Ok(());
        }
        let compiled = compile_patterns(patterns)?;
        self.visibility.show_matching(&self.columns, &compiled);
        self.columns_changed();
        Ok(())
    }

    fn columns_changed(&mut self) {
        self.persist_visibility();
        self.events.push(TableEvent::ColumnsChanged {
            visible: self.visibility.ordered_keys(&self.columns),
        });
        self.recompute();
    }

    fn persist_visibility(&self) {
        let (Some(store), Some(id)) = (&self.store, &self.config.persistence_id) else {
            return;
        };
        let saved = self
            .visibility
            .snapshot(&self.columns)
            .and_then(|snapshot| store.save(id, &snapshot));
        if let Err(e) = saved {
            tracing::warn!(id = %id, error = %e, "could not persist column snapshot");
        }
    }

    pub fn is_column_visible(&self, key: &str) -> bool {
        self.visibility.is_visible(key)
    }

    /// Visible columns in header order.
    pub fn visible_columns(&self) -> Vec<&Column> {
        self.visibility.visible_columns(&self.columns)
    }

    /// Visible column keys in header order.
    pub fn visible_keys(&self) -> Vec<String> {
        self.visibility.ordered_keys(&self.columns)
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    // ------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------

    /// Flip one row's selection. Returns whether it is now selected.
    pub fn toggle_row(&mut self, key: RowKey) -> bool {
        if !self.config.selectable {
            return false;
        }
        let selected = self.selection.toggle(key);
        self.selection_changed();
        selected
    }

    /// Whether every row on the current page is selected.
    pub fn is_page_selected(&self) -> bool {
        self.selection.all_selected(&self.page_keys())
    }

    /// Select the whole page, or clear it when it is fully selected.
    ///
    /// An empty page changes nothing and emits nothing.
    pub fn toggle_page_selection(&mut self) {
        if !self.config.selectable {
            return;
        }
        let keys = self.page_keys();
        let before = self.selection.len();
        self.selection.toggle_page(&keys);
        if self.selection.len() != before {
            self.selection_changed();
        }
    }

    fn selection_changed(&mut self) {
        self.events.push(TableEvent::SelectionChanged {
            selected: self.selection.keys(),
        });
    }

    pub fn is_selected(&self, key: &RowKey) -> bool {
        self.selection.contains(key)
    }

    pub fn selected_keys(&self) -> Vec<RowKey> {
        self.selection.keys()
    }

    // ------------------------------------------------------------------
    // Rows
    // ------------------------------------------------------------------

    /// Report a row on the current page as activated.
    pub fn activate_row(&mut self, index_on_page: usize) -> bool {
        let Some(&source) = self.derived.page_indices().get(index_on_page) else {
            return false;
        };
        let Some(row) = self.rows.get(source) else {
            return false;
        };
        self.events.push(TableEvent::RowActivated {
            row: row.clone(),
            index: index_on_page,
        });
        true
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Filtered and sorted rows, every page.
    pub fn ordered_rows(&self) -> Vec<&Row> {
        self.derived
            .ordered
            .iter()
            .filter_map(|&i| self.rows.get(i))
            .collect()
    }

    /// Rows on the current page.
    pub fn page_rows(&self) -> Vec<&Row> {
        self.derived
            .page_indices()
            .iter()
            .filter_map(|&i| self.rows.get(i))
            .collect()
    }

    /// Keys of the rows on the current page.
    pub fn page_keys(&self) -> Vec<RowKey> {
        self.derived
            .page_indices()
            .iter()
            .filter_map(|&i| self.keys.get(i).cloned())
            .collect()
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    // ------------------------------------------------------------------
    // Output
    // ------------------------------------------------------------------

    /// Where the current window sits in the result.
    pub fn page_info(&self) -> PageInfo {
        let shown = self.derived.window.len();
        let total = self.filtered_len();
        let first = if shown == 0 {
            0
        } else if self.config.delegated {
            (self.page - 1) * self.page_size + 1
        } else {
            self.derived.window.start + 1
        };
        PageInfo {
            page: self.page,
            total_pages: self.total_pages(),
            page_size: self.page_size,
            first,
            last: if shown == 0 { 0 } else { first + shown - 1 },
            total,
        }
    }

    /// Formatted grid for the current page.
    pub fn presentation(&self) -> Presentation {
        let columns = self.visible_columns();
        let info = self.page_info();
        let number_from = self.config.show_row_numbers.then_some(info.first.max(1));
        Presentation::build(
            PageSource {
                columns: &columns,
                rows: &self.rows,
                page: self.derived.page_indices(),
                keys: &self.keys,
                selection: &self.selection,
                sort: &self.sort,
                number_from,
                selectable: self.config.selectable,
            },
            info,
            Layout {
                sticky_header: self.config.sticky_header,
                sticky_first_column: self.config.sticky_first_column,
                dense: self.config.dense,
            },
        )
    }

    /// Every filtered, sorted row (not just the page) as an export sheet.
    ///
    /// Columns are all columns, or only the visible ones when
    /// `export_visible_only` is set.
    pub fn export_sheet(&self) -> ExportSheet {
        let columns: Vec<&Column> = if self.config.export_visible_only {
            self.visible_columns()
        } else {
            self.columns.iter().collect()
        };
        ExportSheet::build(&self.rows, &self.derived.ordered, &columns)
    }

    /// Hand the export sheet to `writer`.
    pub fn export_to(
        &self,
        writer: Option<&dyn SpreadsheetWriter>,
        path: impl AsRef<Path>,
    ) -> Result<Outcome> {
        let Some(writer) = writer.filter(|_| self.config.show_export) else {
            tracing::debug!("export skipped");
            return Ok(Outcome::Skipped);
        };
        writer.write(&self.export_sheet(), path.as_ref())?;
        Ok(Outcome::Done)
    }

    /// Printable document for what is currently displayed.
    pub fn print_document(&self, title: &str) -> PrintDocument {
        PrintDocument::from_presentation(&self.presentation(), title)
    }

    /// Hand the print document to `surface`.
    pub fn print_to(
        &self,
        surface: Option<&mut dyn PrintSurface>,
        title: &str,
    ) -> Result<Outcome> {
        let Some(surface) = surface.filter(|_| self.config.show_print) else {
            tracing::debug!("print skipped");
            return Ok(Outcome::Skipped);
        };
        surface.present(&self.print_document(title))?;
        Ok(Outcome::Done)
    }

    // ------------------------------------------------------------------
    // Events
    // ------------------------------------------------------------------

    /// Take every queued notification.
    pub fn drain_events(&mut self) -> Vec<TableEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn events(&self) -> &[TableEvent] {
        &self.events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::print::HtmlWriterSurface;
    use crate::output::XlsxWriter;
    use crate::query::SortDirection;
    use crate::state::MemoryStore;
    use serde_json::{json, Value};
    use std::time::Duration;
    use tempfile::tempdir;

    fn rows(values: Vec<Value>) -> Vec<Row> {
        values
            .into_iter()
            .map(|v| v.as_object().cloned().unwrap())
            .collect()
    }

    fn people() -> Vec<Row> {
        rows(vec![
            json!({"id": 1, "name": "Anna", "city": "Oslo", "salary": "$1,200.50"}),
            json!({"id": 2, "name": "Bob", "city": "Bergen", "salary": "$99"}),
            json!({"id": 3, "name": "Anders", "city": "Oslo", "salary": "$450"}),
            json!({"id": 4, "name": "carl", "city": "Rome", "salary": null}),
            json!({"id": 5, "name": "Dina", "city": "Kyiv", "salary": "$3,000"}),
        ])
    }

    fn columns() -> Vec<Column> {
        vec![
            Column::new("id", "ID"),
            Column::new("name", "Name"),
            Column::new("city", "City"),
            Column::new("salary", "Salary").unprintable(),
            Column::new("notes", "Notes").hidden().unsortable(),
        ]
    }

    fn view(config: TableConfig) -> TableView {
        let mut view = TableView::new(columns(), config, RowKeySource::field("id"));
        view.set_rows(people());
        view
    }

    fn names(rows: Vec<&Row>) -> Vec<String> {
        rows.iter()
            .map(|r| r.get("name").and_then(|v| v.as_str()).unwrap_or("").to_string())
            .collect()
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_initial_state() {
        let v = view(TableConfig::default());
        assert_eq!(v.page(), 1);
        assert_eq!(v.page_size(), 10);
        assert_eq!(v.total_pages(), 1);
        assert_eq!(v.filtered_len(), 5);
        assert_eq!(v.visible_keys(), vec!["id", "name", "city", "salary"]);
        assert!(v.events().is_empty());
    }

    #[test]
    fn test_debounced_query_applies_last_input_only() {
        let mut v = view(TableConfig::default().page_size(2));
        v.go_to_page(2);
        v.drain_events();

        let start = Instant::now();
        v.input_query("A", start);
        v.input_query("An", start + ms(100));
        assert!(!v.tick(start + ms(300)));
        assert_eq!(v.filtered_len(), 5);
        assert_eq!(v.raw_query(), "An");

        assert!(v.tick(start + ms(350)));
        assert_eq!(v.query(), "an");
        assert_eq!(names(v.ordered_rows()), vec!["Anna", "Anders"]);
        assert_eq!(v.page(), 1);
        assert_eq!(
            v.drain_events(),
            vec![TableEvent::SearchChanged {
                query: "an".to_string()
            }]
        );
    }

    #[test]
    fn test_flush_query() {
        let mut v = view(TableConfig::default());
        assert!(!v.flush_query());
        v.input_query("oslo", Instant::now());
        assert!(v.query_deadline().is_some());
        assert!(v.flush_query());
        assert_eq!(v.filtered_len(), 2);
    }

    #[test]
    fn test_query_searches_visible_columns_only() {
        let mut v = view(TableConfig::default());
        v.toggle_column("city").unwrap();
        v.input_query("oslo", Instant::now());
        v.flush_query();
        assert_eq!(v.filtered_len(), 0);
    }

    #[test]
    fn test_search_disabled_ignores_input() {
        let mut v = view(TableConfig::default().search(false));
        v.input_query("bob", Instant::now());
        assert!(!v.flush_query());
        assert_eq!(v.filtered_len(), 5);
    }

    #[test]
    fn test_toggle_sort_cycle() {
        let mut v = view(TableConfig::default().page_size(2));
        v.go_to_page(3);
        v.drain_events();

        assert!(v.toggle_sort("name"));
        assert_eq!(v.page(), 1);
        assert_eq!(
            names(v.ordered_rows()),
            vec!["Anders", "Anna", "Bob", "carl", "Dina"]
        );

        assert!(v.toggle_sort("name"));
        assert_eq!(v.sort().direction, SortDirection::Descending);
        assert_eq!(
            names(v.ordered_rows()),
            vec!["Dina", "carl", "Bob", "Anna", "Anders"]
        );

        assert!(v.toggle_sort("city"));
        assert_eq!(v.sort(), &SortState::by("city"));

        assert_eq!(
            v.drain_events(),
            vec![
                TableEvent::SortChanged {
                    key: "name".to_string(),
                    ascending: true
                },
                TableEvent::SortChanged {
                    key: "name".to_string(),
                    ascending: false
                },
                TableEvent::SortChanged {
                    key: "city".to_string(),
                    ascending: true
                },
            ]
        );
    }

    #[test]
    fn test_sort_event_uses_alternate_sort_key() {
        let mut v = TableView::new(
            vec![Column::new("label", "Level").sort_by("rank")],
            TableConfig::default(),
            RowKeySource::Positional,
        );
        v.set_rows(rows(vec![
            json!({"label": "high", "rank": 3}),
            json!({"label": "low", "rank": 1}),
        ]));
        assert!(v.toggle_sort("label"));
        assert_eq!(v.sort(), &SortState::by("label"));
        assert_eq!(
            v.drain_events(),
            vec![TableEvent::SortChanged {
                key: "rank".to_string(),
                ascending: true
            }]
        );
    }

    #[test]
    fn test_version_column_sorts_without_panicking() {
        let versions: Vec<Value> = (0..120)
            .map(|i| {
                let version = if i % 3 == 0 {
                    format!("{}.{}.x", i % 4, (i * 7) % 13)
                } else {
                    format!("{}.{}", i % 4, (i * 11) % 17)
                };
                json!({ "id": i, "version": version })
            })
            .collect();
        let mut v = TableView::new(
            vec![Column::new("version", "Version")],
            TableConfig::default().pagination(false),
            RowKeySource::field("id"),
        );
        v.set_rows(rows(versions));

        assert!(v.toggle_sort("version"));
        let first: Vec<Row> = v.ordered_rows().into_iter().cloned().collect();
        assert_eq!(first.len(), 120);
        assert!(v.toggle_sort("version"));
        let mut second: Vec<Row> = v.ordered_rows().into_iter().cloned().collect();
        second.reverse();
        let text = |rows: &[Row]| -> Vec<String> {
            rows.iter()
                .map(|r| r.get("version").and_then(|v| v.as_str()).unwrap_or("").to_string())
                .collect()
        };
        assert_eq!(text(&first), text(&second));
    }

    #[test]
    fn test_unsortable_and_unknown_columns_ignore_sort() {
        let mut v = view(TableConfig::default());
        assert!(!v.toggle_sort("notes"));
        assert!(!v.toggle_sort("missing"));
        assert_eq!(v.sort().key, None);
        assert!(v.events().is_empty());
    }

    #[test]
    fn test_currency_sort_with_absent_last() {
        let mut v = view(TableConfig::default());
        v.toggle_sort("salary");
        assert_eq!(
            names(v.ordered_rows()),
            vec!["Bob", "Anders", "Anna", "Dina", "carl"]
        );
        v.toggle_sort("salary");
        assert_eq!(
            names(v.ordered_rows()),
            vec!["Dina", "Anna", "Anders", "Bob", "carl"]
        );
    }

    #[test]
    fn test_paging_and_clamping() {
        let mut v = view(TableConfig::default().page_size(1));
        v.set_rows(people().into_iter().take(3).collect());
        v.go_to_page(2);
        assert_eq!(names(v.page_rows()), vec!["Bob"]);

        v.go_to_page(5);
        assert_eq!(v.page(), 3);
        assert_eq!(names(v.page_rows()), vec!["Anders"]);

        v.go_to_page(0);
        assert_eq!(v.page(), 1);

        assert_eq!(
            v.drain_events(),
            vec![
                TableEvent::PageChanged { page: 2 },
                TableEvent::PageChanged { page: 3 },
                TableEvent::PageChanged { page: 1 },
            ]
        );
    }

    #[test]
    fn test_next_and_prev_stay_in_range() {
        let mut v = view(TableConfig::default().page_size(2));
        v.prev_page();
        assert_eq!(v.page(), 1);
        v.next_page();
        v.next_page();
        v.next_page();
        assert_eq!(v.page(), 3);
        assert_eq!(names(v.page_rows()), vec!["Dina"]);
    }

    #[test]
    fn test_shrinking_result_clamps_page() {
        let mut v = view(TableConfig::default().page_size(2));
        v.go_to_page(3);
        v.drain_events();

        v.set_rows(people().into_iter().take(3).collect());
        assert_eq!(v.page(), 2);
        assert_eq!(v.drain_events(), vec![TableEvent::PageChanged { page: 2 }]);
    }

    #[test]
    fn test_page_size_change_resets_page() {
        let mut v = view(TableConfig::default().page_size(2));
        v.go_to_page(2);
        v.drain_events();

        v.set_page_size(3);
        assert_eq!(v.page(), 1);
        assert_eq!(v.total_pages(), 2);
        assert_eq!(
            v.drain_events(),
            vec![TableEvent::PageSizeChanged { page_size: 3 }]
        );

        v.set_page_size(0);
        assert_eq!(v.page_size(), 1);
    }

    #[test]
    fn test_pagination_disabled() {
        let v = view(TableConfig::default().page_size(2).pagination(false));
        assert_eq!(v.page_rows().len(), 5);
    }

    #[test]
    fn test_delegated_mode_passes_rows_through() {
        let mut v = view(TableConfig::default().delegated(true).page_size(2));
        v.set_external_total(Some(40));
        assert_eq!(v.total_pages(), 20);

        v.toggle_sort("name");
        v.input_query("zzz", Instant::now());
        v.flush_query();
        v.go_to_page(7);

        assert_eq!(v.page_rows().len(), 5);
        assert_eq!(names(v.page_rows())[0], "Anna");
        assert_eq!(v.page(), 7);
        let info = v.page_info();
        assert_eq!((info.first, info.last, info.total), (13, 17, 40));

        let events = v.drain_events();
        assert!(events.contains(&TableEvent::SearchChanged {
            query: "zzz".to_string()
        }));
        assert!(events.contains(&TableEvent::PageChanged { page: 7 }));
    }

    #[test]
    fn test_delegated_sort_keeps_page() {
        let mut v = view(TableConfig::default().delegated(true).page_size(2));
        v.set_external_total(Some(40));
        v.go_to_page(4);
        v.toggle_sort("name");
        assert_eq!(v.page(), 4);
    }

    #[test]
    fn test_column_toggle_emits_and_persists() {
        let store = MemoryStore::new();
        let config = TableConfig::default().persistence_id("people");
        let mut v = TableView::new(columns(), config.clone(), RowKeySource::field("id"))
            .with_store(store.clone());
        v.set_rows(people());

        assert!(!v.toggle_column("city").unwrap());
        assert!(v.toggle_column("notes").unwrap());
        assert_eq!(
            v.drain_events(),
            vec![
                TableEvent::ColumnsChanged {
                    visible: vec!["id".into(), "name".into(), "salary".into()]
                },
                TableEvent::ColumnsChanged {
                    visible: vec![
                        "id".into(),
                        "name".into(),
                        "salary".into(),
                        "notes".into()
                    ]
                },
            ]
        );

        let restored = TableView::new(columns(), config, RowKeySource::field("id"))
            .with_store(store.clone());
        assert_eq!(restored.visible_keys(), v.visible_keys());
        assert!(store.load("people").unwrap().is_some());
    }

    #[test]
    fn test_malformed_snapshot_uses_defaults() {
        let store = MemoryStore::new();
        store.save("people", "{broken").unwrap();
        let v = TableView::new(
            columns(),
            TableConfig::default().persistence_id("people"),
            RowKeySource::field("id"),
        )
        .with_store(store);
        assert_eq!(v.visible_keys(), vec!["id", "name", "city", "salary"]);
    }

    #[test]
    fn test_toggle_all_columns() {
        let mut v = view(TableConfig::default());
        v.toggle_all_columns();
        assert_eq!(v.visible_keys().len(), 5);
        v.toggle_all_columns();
        assert!(v.visible_keys().is_empty());
        assert_eq!(v.drain_events().len(), 2);
    }

    #[test]
    fn test_unknown_column_toggle_is_an_error() {
        let mut v = view(TableConfig::default());
        assert!(matches!(
            v.toggle_column("nope"),
            Err(DataTableError::UnknownColumn(_))
        ));
    }

    #[test]
    fn test_columns_toggle_disabled() {
        let store = MemoryStore::new();
        let mut v = TableView::new(
            columns(),
            TableConfig::default()
                .columns_toggle(false)
                .persistence_id("people"),
            RowKeySource::field("id"),
        )
        .with_store(store.clone());
        v.set_rows(people());

        assert!(v.toggle_column("city").unwrap());
        v.toggle_all_columns();
        v.show_columns_matching(&["n*"]).unwrap();
        assert!(v.events().is_empty());
        assert_eq!(v.visible_keys(), vec!["id", "name", "city", "salary"]);
        assert_eq!(store.load("people").unwrap(), None);
    }

    #[test]
    fn test_show_columns_matching() {
        let mut v = view(TableConfig::default());
        v.show_columns_matching(&["n*"]).unwrap();
        assert_eq!(v.visible_keys(), vec!["name", "notes"]);
        assert!(v.show_columns_matching(&["[bad"]).is_err());
    }

    #[test]
    fn test_row_selection() {
        let mut v = view(TableConfig::default().selectable(true).page_size(2));
        assert!(v.toggle_row(RowKey::Number(5)));
        assert!(!v.is_page_selected());

        v.toggle_page_selection();
        assert!(v.is_page_selected());
        assert_eq!(
            v.selected_keys(),
            vec![RowKey::Number(1), RowKey::Number(2), RowKey::Number(5)]
        );

        v.toggle_page_selection();
        assert_eq!(v.selected_keys(), vec![RowKey::Number(5)]);

        let events = v.drain_events();
        assert_eq!(events.len(), 3);
        assert_eq!(
            events[2],
            TableEvent::SelectionChanged {
                selected: vec![RowKey::Number(5)]
            }
        );
    }

    #[test]
    fn test_selection_survives_filtering() {
        let mut v = view(TableConfig::default().selectable(true));
        v.toggle_row(RowKey::Number(2));
        v.input_query("oslo", Instant::now());
        v.flush_query();
        assert!(v.is_selected(&RowKey::Number(2)));
        assert!(!v.is_page_selected());
    }

    #[test]
    fn test_page_selection_on_empty_page_is_silent() {
        let mut v = view(TableConfig::default().selectable(true));
        v.input_query("zzz", Instant::now());
        v.flush_query();
        v.drain_events();

        assert!(!v.is_page_selected());
        v.toggle_page_selection();
        assert!(v.selected_keys().is_empty());
        assert!(v.events().is_empty());
    }

    #[test]
    fn test_selection_disabled() {
        let mut v = view(TableConfig::default());
        assert!(!v.toggle_row(RowKey::Number(1)));
        v.toggle_page_selection();
        assert!(v.selected_keys().is_empty());
        assert!(v.events().is_empty());
    }

    #[test]
    fn test_seeded_selection() {
        let mut v = view(TableConfig::default().selectable(true));
        v.set_selection(vec![RowKey::Number(9)]);
        assert!(v.is_selected(&RowKey::Number(9)));
        assert!(v.events().is_empty());
    }

    #[test]
    fn test_positional_keys_follow_source_order() {
        let mut v = TableView::new(
            columns(),
            TableConfig::default().selectable(true),
            RowKeySource::Positional,
        );
        v.set_rows(people());
        v.toggle_sort("name");
        assert_eq!(v.page_keys()[0], RowKey::Number(2));
    }

    #[test]
    fn test_activate_row() {
        let mut v = view(TableConfig::default().page_size(2));
        v.go_to_page(2);
        v.drain_events();
        assert!(v.activate_row(1));
        assert!(!v.activate_row(5));
        match &v.drain_events()[..] {
            [TableEvent::RowActivated { row, index }] => {
                assert_eq!(row.get("name"), Some(&json!("Dina")));
                assert_eq!(*index, 1);
            }
            other => panic!("unexpected events: {:?}", other),
        }
    }

    #[test]
    fn test_presentation_window() {
        let mut v = view(
            TableConfig::default()
                .page_size(2)
                .selectable(true)
                .row_numbers(true)
                .dense(true),
        );
        v.toggle_row(RowKey::Number(3));
        v.go_to_page(2);
        let p = v.presentation();
        assert_eq!(p.leading_columns(), 2);
        assert_eq!(p.rows.len(), 2);
        assert_eq!(p.rows[0].cells[..3], ["[x]", "3", "3"]);
        assert_eq!(p.info.summary(), "Showing 3 to 4 of 5 entries");
        assert!(p.layout.dense);
    }

    #[test]
    fn test_export_sheet_is_unpaginated() {
        let mut v = view(TableConfig::default().page_size(2));
        v.toggle_sort("name");
        let sheet = v.export_sheet();
        assert_eq!(sheet.headers, vec!["ID", "Name", "City", "Salary", "Notes"]);
        assert_eq!(sheet.rows.len(), 5);
        assert_eq!(sheet.rows[0][1], json!("Anders"));
        assert_eq!(sheet.rows[0][4], Value::Null);
    }

    #[test]
    fn test_export_visible_only() {
        let mut v = view(TableConfig::default().export_visible_only(true));
        v.toggle_column("salary").unwrap();
        assert_eq!(v.export_sheet().headers, vec!["ID", "Name", "City"]);
    }

    #[test]
    fn test_export_to_writer_and_skip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("people.xlsx");
        let v = view(TableConfig::default());

        assert_eq!(v.export_to(None, &path).unwrap(), Outcome::Skipped);
        assert!(!path.exists());

        assert_eq!(v.export_to(Some(&XlsxWriter), &path).unwrap(), Outcome::Done);
        assert!(path.exists());

        let disabled = view(TableConfig::default().export(false));
        let other = dir.path().join("other.xlsx");
        assert_eq!(
            disabled.export_to(Some(&XlsxWriter), &other).unwrap(),
            Outcome::Skipped
        );
        assert!(!other.exists());
    }

    #[test]
    fn test_print_document_drops_unprintable() {
        let mut v = view(TableConfig::default().selectable(true).page_size(2));
        v.toggle_sort("name");
        let doc = v.print_document("People");
        assert_eq!(doc.headers, vec!["ID", "Name", "City"]);
        assert_eq!(doc.rows, vec![vec!["3", "Anders", "Oslo"], vec!["1", "Anna", "Oslo"]]);
    }

    #[test]
    fn test_print_to_surface_and_skip() {
        let v = view(TableConfig::default());
        assert_eq!(v.print_to(None, "People").unwrap(), Outcome::Skipped);

        let mut surface = HtmlWriterSurface { writer: Vec::new() };
        assert_eq!(
            v.print_to(Some(&mut surface), "People").unwrap(),
            Outcome::Done
        );
        let html = String::from_utf8(surface.writer).unwrap();
        assert!(html.contains("<h1>People</h1>"));
        assert!(!html.contains("Salary"));
    }
}
