//! Output: present, export and print the derived view.
//!
//! This module handles the final stage of the pipeline. It provides:
//!
//! - **Presentation**: formatted page grid with headers and leading columns
//! - **ExportSheet**: raw values keyed by caption, for spreadsheet writers
//! - **PrintDocument**: printable columns only, rendered to HTML
//!
//! Export and print hand their result to an external collaborator
//! (`SpreadsheetWriter`, `PrintSurface`). When no collaborator is
//! available the operation is skipped rather than failed.

pub mod export;
pub mod print;
pub mod table;

pub use export::{ExportSheet, JsonWriter, SpreadsheetWriter, XlsxWriter};
pub use print::{HtmlFileSurface, HtmlWriterSurface, PrintDocument, PrintSurface};
pub use table::{HeaderCell, HeaderKind, Layout, PageInfo, Presentation, PresentedRow};

/// Result of an operation that depends on an optional collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Output was handed to the collaborator
    Done,
    /// No collaborator, or the control is disabled
    Skipped,
}
