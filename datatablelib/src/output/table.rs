//! Presentation-ready table for the current page.
//!
//! The data flow is:
//! 1. Raw rows
//! 2. RowSet (filtered, sorted, windowed indices)
//! 3. Presentation (formatted strings for display)
//!
//! Presentation is a pure formatting layer. It lays the page out as a flat
//! grid: optional leading selection and row-number columns, then one
//! column per visible data column. Everything downstream (terminal
//! rendering, printing) works on this grid by position.

use serde::{Deserialize, Serialize};

use crate::data::{Align, Column, Row, RowKey};
use crate::query::{SortDirection, SortState};
use crate::state::Selection;

pub const CHECKED: &str = "[x]";
pub const UNCHECKED: &str = "[ ]";

/// What a presentation column shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HeaderKind {
    /// Per-row checkbox
    Selection,
    /// 1-based position in the filtered, sorted sequence
    RowNumber,
    Data { key: String },
}

/// One header cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderCell {
    #[serde(flatten)]
    pub kind: HeaderKind,
    pub label: String,
    pub align: Align,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<usize>,
    pub sortable: bool,
    pub printable: bool,
    /// Direction when this is the active sort column
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sorted: Option<SortDirection>,
}

/// One displayed row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresentedRow {
    pub key: RowKey,
    pub selected: bool,
    /// Cell text for every presentation column, leading columns included
    pub cells: Vec<String>,
}

/// Where the window sits in the full result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PageInfo {
    pub page: usize,
    pub total_pages: usize,
    pub page_size: usize,
    /// 1-based position of the first row shown (0 when empty)
    pub first: usize,
    /// 1-based position of the last row shown (0 when empty)
    pub last: usize,
    /// Rows after filtering
    pub total: usize,
}

impl PageInfo {
    pub fn summary(&self) -> String {
        format!("Showing {} to {} of {} entries", self.first, self.last, self.total)
    }
}

/// Rendering hints carried through to front ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Layout {
    pub sticky_header: bool,
    pub sticky_first_column: bool,
    pub dense: bool,
}

/// Inputs needed to lay out one page.
pub struct PageSource<'a> {
    pub columns: &'a [&'a Column],
    pub rows: &'a [Row],
    /// Source indices of the rows on the page, in display order
    pub page: &'a [usize],
    /// Key per source row
    pub keys: &'a [RowKey],
    pub selection: &'a Selection,
    pub sort: &'a SortState,
    /// Number of the first row on the page, when row numbers are shown
    pub number_from: Option<usize>,
    pub selectable: bool,
}

/// Table-ready page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Presentation {
    pub headers: Vec<HeaderCell>,
    pub rows: Vec<PresentedRow>,
    pub info: PageInfo,
    pub layout: Layout,
    /// Whether every row on the page is selected
    pub page_selected: bool,
}

fn leading_header(kind: HeaderKind, label: &str, align: Align) -> HeaderCell {
    HeaderCell {
        kind,
        label: label.to_string(),
        align,
        width: None,
        sortable: false,
        printable: true,
        sorted: None,
    }
}

impl Presentation {
    pub fn build(source: PageSource<'_>, info: PageInfo, layout: Layout) -> Self {
        let page_keys: Vec<RowKey> = source
            .page
            .iter()
            .filter_map(|&i| source.keys.get(i).cloned())
            .collect();
        let page_selected = source.selection.all_selected(&page_keys);

        let mut headers = Vec::new();
        if source.selectable {
            let label = if page_selected { CHECKED } else { UNCHECKED };
            headers.push(leading_header(HeaderKind::Selection, label, Align::Center));
        }
        if source.number_from.is_some() {
            headers.push(leading_header(HeaderKind::RowNumber, "#", Align::Right));
        }
        for col in source.columns {
            let sorted = match &source.sort.key {
                Some(key) if *key == col.key => Some(source.sort.direction),
                _ => None,
            };
            headers.push(HeaderCell {
                kind: HeaderKind::Data {
                    key: col.key.clone(),
                },
                label: col.label().to_string(),
                align: col.align,
                width: col.width,
                sortable: col.sortable,
                printable: col.printable,
                sorted,
            });
        }

        let rows = source
            .page
            .iter()
            .zip(page_keys)
            .enumerate()
            .filter_map(|(pos, (&index, key))| {
                let row = source.rows.get(index)?;
                let selected = source.selection.contains(&key);
                let mut cells = Vec::with_capacity(headers.len());
                if source.selectable {
                    cells.push(if selected { CHECKED } else { UNCHECKED }.to_string());
                }
                if let Some(from) = source.number_from {
                    cells.push((from + pos).to_string());
                }
                cells.extend(source.columns.iter().map(|col| col.display(row)));
                Some(PresentedRow {
                    key,
                    selected,
                    cells,
                })
            })
            .collect();

        Presentation {
            headers,
            rows,
            info,
            layout,
            page_selected,
        }
    }

    /// Number of selection / row-number columns before the data columns.
    pub fn leading_columns(&self) -> usize {
        self.headers
            .iter()
            .take_while(|h| !matches!(h.kind, HeaderKind::Data { .. }))
            .count()
    }

    /// Remove one presentation column (header and every row cell).
    pub fn remove_column(&mut self, position: usize) {
        if position < self.headers.len() {
            self.headers.remove(position);
        }
        for row in &mut self.rows {
            if position < row.cells.len() {
                row.cells.remove(position);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn rows(values: Vec<Value>) -> Vec<Row> {
        values
            .into_iter()
            .map(|v| v.as_object().cloned().unwrap())
            .collect()
    }

    fn sample() -> (Vec<Row>, Vec<Column>, Vec<RowKey>) {
        let data = rows(vec![
            json!({"id": 1, "name": "Bob", "price": 3}),
            json!({"id": 2, "name": "ann", "price": 12}),
            json!({"id": 3, "name": "Cy", "price": 7}),
        ]);
        let cols = vec![
            Column::new("name", "Name"),
            Column::new("price", "Price")
                .align(Align::Right)
                .formatter(|v: Option<&Value>, _: &Row| {
                    format!("{:.2}", v.and_then(|v| v.as_f64()).unwrap_or(0.0))
                }),
        ];
        let keys = (1..=3).map(RowKey::Number).collect();
        (data, cols, keys)
    }

    #[test]
    fn test_plain_layout() {
        let (data, cols, keys) = sample();
        let visible: Vec<&Column> = cols.iter().collect();
        let selection = Selection::new();
        let sort = SortState::by("name").descending();
        let p = Presentation::build(
            PageSource {
                columns: &visible,
                rows: &data,
                page: &[2, 0],
                keys: &keys,
                selection: &selection,
                sort: &sort,
                number_from: None,
                selectable: false,
            },
            PageInfo::default(),
            Layout::default(),
        );

        assert_eq!(p.leading_columns(), 0);
        assert_eq!(p.headers.len(), 2);
        assert_eq!(p.headers[0].sorted, Some(SortDirection::Descending));
        assert_eq!(p.headers[1].sorted, None);
        assert_eq!(p.rows[0].cells, vec!["Cy", "7.00"]);
        assert_eq!(p.rows[1].cells, vec!["Bob", "3.00"]);
        assert_eq!(p.rows[1].key, RowKey::Number(1));
    }

    #[test]
    fn test_selection_and_row_numbers() {
        let (data, cols, keys) = sample();
        let visible: Vec<&Column> = cols.iter().collect();
        let selection = Selection::from_keys(vec![RowKey::Number(2)]);
        let sort = SortState::default();
        let p = Presentation::build(
            PageSource {
                columns: &visible,
                rows: &data,
                page: &[1, 2],
                keys: &keys,
                selection: &selection,
                sort: &sort,
                number_from: Some(11),
                selectable: true,
            },
            PageInfo::default(),
            Layout::default(),
        );

        assert_eq!(p.leading_columns(), 2);
        assert_eq!(p.headers[0].kind, HeaderKind::Selection);
        assert_eq!(p.headers[0].label, UNCHECKED);
        assert_eq!(p.rows[0].cells, vec![CHECKED, "11", "ann", "12.00"]);
        assert_eq!(p.rows[1].cells, vec![UNCHECKED, "12", "Cy", "7.00"]);
        assert!(p.rows[0].selected);
        assert!(!p.page_selected);
    }

    #[test]
    fn test_remove_column() {
        let (data, cols, keys) = sample();
        let visible: Vec<&Column> = cols.iter().collect();
        let selection = Selection::new();
        let sort = SortState::default();
        let mut p = Presentation::build(
            PageSource {
                columns: &visible,
                rows: &data,
                page: &[0],
                keys: &keys,
                selection: &selection,
                sort: &sort,
                number_from: Some(1),
                selectable: false,
            },
            PageInfo::default(),
            Layout::default(),
        );
        p.remove_column(1);
        assert_eq!(p.headers.len(), 2);
        assert_eq!(p.rows[0].cells, vec!["1", "3.00"]);
    }

    #[test]
    fn test_page_info_summary() {
        let info = PageInfo {
            page: 2,
            total_pages: 5,
            page_size: 10,
            first: 11,
            last: 20,
            total: 42,
        };
        assert_eq!(info.summary(), "Showing 11 to 20 of 42 entries");
    }
}
