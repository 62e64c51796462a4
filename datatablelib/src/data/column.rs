//! Column (header) definitions: the table schema.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::row::{cell_text, resolve, Row};

/// Horizontal alignment of a column's cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

/// Strategy rendering a cell for display.
///
/// Formatters only affect presentation; filtering, sorting and export
/// always work on the raw resolved value.
pub trait CellFormatter {
    fn format(&self, value: Option<&Value>, row: &Row) -> String;
}

impl<F> CellFormatter for F
where
    F: Fn(Option<&Value>, &Row) -> String,
{
    fn format(&self, value: Option<&Value>, row: &Row) -> String {
        self(value, row)
    }
}

fn default_true() -> bool {
    true
}

/// One schema entry. Order in the column list is display order.
#[derive(Clone, Serialize, Deserialize)]
pub struct Column {
    /// Dot-path into the row
    pub key: String,
    /// Header text; the key is shown when empty
    #[serde(default)]
    pub caption: String,
    /// Visible unless a persisted snapshot says otherwise
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default = "default_true")]
    pub sortable: bool,
    #[serde(default = "default_true")]
    pub printable: bool,
    #[serde(default)]
    pub align: Align,
    /// Display width in characters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<usize>,
    /// Alternate dot-path used when sorting by this column
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_key: Option<String>,
    #[serde(skip)]
    pub formatter: Option<Arc<dyn CellFormatter + Send + Sync>>,
}

impl Column {
    pub fn new(key: impl Into<String>, caption: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            caption: caption.into(),
            visible: true,
            sortable: true,
            printable: true,
            align: Align::Left,
            width: None,
            sort_key: None,
            formatter: None,
        }
    }

    /// Builder: hidden by default
    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    /// Builder: ignore sort toggles
    pub fn unsortable(mut self) -> Self {
        self.sortable = false;
        self
    }

    /// Builder: leave out of printed output
    pub fn unprintable(mut self) -> Self {
        self.printable = false;
        self
    }

    pub fn align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    pub fn width(mut self, width: usize) -> Self {
        self.width = Some(width);
        self
    }

    /// Builder: sort by another field
    pub fn sort_by(mut self, path: impl Into<String>) -> Self {
        self.sort_key = Some(path.into());
        self
    }

    pub fn formatter(mut self, formatter: impl CellFormatter + Send + Sync + 'static) -> Self {
        self.formatter = Some(Arc::new(formatter));
        self
    }

    /// Header text shown to users.
    pub fn label(&self) -> &str {
        if self.caption.is_empty() {
            &self.key
        } else {
            &self.caption
        }
    }

    /// Path the sort stage resolves for this column.
    pub fn sort_path(&self) -> &str {
        self.sort_key.as_deref().unwrap_or(&self.key)
    }

    /// Raw cell value for this column.
    pub fn value<'a>(&self, row: &'a Row) -> Option<&'a Value> {
        resolve(row, &self.key)
    }

    /// Display text for this column, through the formatter when present.
    pub fn display(&self, row: &Row) -> String {
        let value = self.value(row);
        match &self.formatter {
            Some(formatter) => formatter.format(value, row),
            None => cell_text(value),
        }
    }

    /// Build one column per key of the first row, in key order.
    pub fn infer(rows: &[Row]) -> Vec<Column> {
        rows.first()
            .map(|row| row.keys().map(|k| Column::new(k.clone(), k.clone())).collect())
            .unwrap_or_default()
    }
}

impl fmt::Debug for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("key", &self.key)
            .field("caption", &self.caption)
            .field("visible", &self.visible)
            .field("sortable", &self.sortable)
            .field("printable", &self.printable)
            .field("align", &self.align)
            .field("width", &self.width)
            .field("sort_key", &self.sort_key)
            .field("formatter", &self.formatter.is_some())
            .finish()
    }
}
