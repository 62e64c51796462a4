//! Print adapter: a standalone document of the printable columns.
//!
//! The printed page mirrors what is displayed (same filter, sort and page
//! window). It is derived from a clone of the presentation by removing,
//! by position, the selection column and every column flagged as not
//! printable. Row numbers are kept.

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use minijinja::{AutoEscape, Environment};
use serde::Serialize;

use crate::data::Align;
use crate::Result;

use super::table::{HeaderKind, Presentation};

const PRINT_TEMPLATE: &str = include_str!("../../templates/print.html");

/// Printable snapshot of the displayed table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrintDocument {
    pub title: String,
    pub headers: Vec<String>,
    pub aligns: Vec<Align>,
    pub rows: Vec<Vec<String>>,
}

/// Positions of presentation columns that must not be printed.
pub fn unprintable_positions(presentation: &Presentation) -> Vec<usize> {
    let offset = presentation.leading_columns();
    let mut positions: Vec<usize> = presentation.headers[..offset]
        .iter()
        .enumerate()
        .filter(|(_, h)| h.kind == HeaderKind::Selection)
        .map(|(i, _)| i)
        .collect();
    positions.extend(
        presentation.headers[offset..]
            .iter()
            .enumerate()
            .filter(|(_, h)| !h.printable)
            .map(|(i, _)| offset + i),
    );
    positions
}

impl PrintDocument {
    pub fn from_presentation(presentation: &Presentation, title: impl Into<String>) -> Self {
        let mut printable = presentation.clone();
        let mut positions = unprintable_positions(&printable);
        positions.sort_unstable_by(|a, b| b.cmp(a));
        for position in positions {
            printable.remove_column(position);
        }

        PrintDocument {
            title: title.into(),
            headers: printable.headers.iter().map(|h| h.label.clone()).collect(),
            aligns: printable.headers.iter().map(|h| h.align).collect(),
            rows: printable.rows.into_iter().map(|r| r.cells).collect(),
        }
    }

    /// Render as a self-contained HTML page. Cell text is HTML-escaped.
    pub fn to_html(&self) -> Result<String> {
        let mut env = Environment::new();
        env.set_auto_escape_callback(|_| AutoEscape::Html);
        env.add_template("print.html", PRINT_TEMPLATE)?;
        Ok(env.get_template("print.html")?.render(self)?)
    }
}

/// Output surface receiving a print document.
pub trait PrintSurface {
    fn present(&mut self, document: &PrintDocument) -> Result<()>;
}

/// Writes the HTML rendering to a file.
#[derive(Debug, Clone)]
pub struct HtmlFileSurface {
    pub path: PathBuf,
}

impl HtmlFileSurface {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl PrintSurface for HtmlFileSurface {
    fn present(&mut self, document: &PrintDocument) -> Result<()> {
        fs::write(&self.path, document.to_html()?)?;
        Ok(())
    }
}

/// Streams the HTML rendering to any writer (stdout, a buffer).
#[derive(Debug)]
pub struct HtmlWriterSurface<W: Write> {
    pub writer: W,
}

impl<W: Write> PrintSurface for HtmlWriterSurface<W> {
    fn present(&mut self, document: &PrintDocument) -> Result<()> {
        self.writer.write_all(document.to_html()?.as_bytes())?;
        self.writer.flush()?;
        Ok(())
    }
}
