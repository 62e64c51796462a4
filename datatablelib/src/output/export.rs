//! Export adapter: a columnar record set for spreadsheet output.
//!
//! Field names are column captions; values are the raw resolved cells,
//! never formatter output. Encoding is delegated to a `SpreadsheetWriter`.

use std::fs;
use std::path::Path;

use rust_xlsxwriter::{Format, Workbook};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::data::{Column, Row};
use crate::Result;

/// Sheet name used when none is given.
pub const DEFAULT_SHEET_NAME: &str = "Data";

/// Export-ready rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportSheet {
    pub name: String,
    /// Column captions, in column order
    pub headers: Vec<String>,
    /// Requested column widths, aligned with `headers`
    pub widths: Vec<Option<usize>>,
    /// Raw values; absent cells are `null`
    pub rows: Vec<Vec<Value>>,
}

impl ExportSheet {
    /// Build a sheet from `rows` in `order`, one field per column.
    pub fn build(rows: &[Row], order: &[usize], columns: &[&Column]) -> Self {
        let rows = order
            .iter()
            .filter_map(|&i| rows.get(i))
            .map(|row| {
                columns
                    .iter()
                    .map(|col| col.value(row).cloned().unwrap_or(Value::Null))
                    .collect()
            })
            .collect();

        ExportSheet {
            name: DEFAULT_SHEET_NAME.to_string(),
            headers: columns.iter().map(|c| c.label().to_string()).collect(),
            widths: columns.iter().map(|c| c.width).collect(),
            rows,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// One object per row, keyed by caption.
    ///
    /// Duplicate captions collapse into one field; the rightmost wins.
    pub fn records(&self) -> Vec<Map<String, Value>> {
        self.rows
            .iter()
            .map(|row| {
                self.headers
                    .iter()
                    .cloned()
                    .zip(row.iter().cloned())
                    .collect()
            })
            .collect()
    }
}

/// Encoder turning a sheet into a file.
pub trait SpreadsheetWriter {
    fn write(&self, sheet: &ExportSheet, path: &Path) -> Result<()>;
}

/// Excel (.xlsx) writer backed by `rust_xlsxwriter`.
#[derive(Debug, Clone, Copy, Default)]
pub struct XlsxWriter;

impl XlsxWriter {
    fn workbook(sheet: &ExportSheet) -> Result<Workbook> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(&sheet.name)?;

        let bold = Format::new().set_bold();
        for (col, header) in sheet.headers.iter().enumerate() {
            worksheet.write_string_with_format(0, col as u16, header, &bold)?;
        }
        for (col, width) in sheet.widths.iter().enumerate() {
            if let Some(width) = width {
                worksheet.set_column_width(col as u16, *width as f64)?;
            }
        }

        for (r, values) in sheet.rows.iter().enumerate() {
            let row = (r + 1) as u32;
            for (c, value) in values.iter().enumerate() {
                let col = c as u16;
                match value {
                    Value::Null => {}
                    Value::Bool(b) => {
                        worksheet.write_boolean(row, col, *b)?;
                    }
                    Value::Number(n) => match n.as_f64() {
                        Some(f) => {
                            worksheet.write_number(row, col, f)?;
                        }
                        None => {
                            worksheet.write_string(row, col, n.to_string())?;
                        }
                    },
                    Value::String(s) => {
                        worksheet.write_string(row, col, s)?;
                    }
                    other => {
                        worksheet.write_string(row, col, other.to_string())?;
                    }
                }
            }
        }

        Ok(workbook)
    }

    /// Encode into an in-memory .xlsx file.
    pub fn to_buffer(&self, sheet: &ExportSheet) -> Result<Vec<u8>> {
        let mut workbook = Self::workbook(sheet)?;
        Ok(workbook.save_to_buffer()?)
    }
}

impl SpreadsheetWriter for XlsxWriter {
    fn write(&self, sheet: &ExportSheet, path: &Path) -> Result<()> {
        let mut workbook = Self::workbook(sheet)?;
        workbook.save(path)?;
        Ok(())
    }
}

/// Writes records as a pretty-printed JSON array.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonWriter;

impl SpreadsheetWriter for JsonWriter {
    fn write(&self, sheet: &ExportSheet, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(&sheet.records())?;
        fs::write(path, json)?;
        Ok(())
    }
}
