//! Template rendering for CLI output using minijinja

use console::{measure_text_width, pad_str, truncate_str, Alignment, Style};
use datatablelib::output::HeaderCell;
use datatablelib::{Align, Presentation};
use minijinja::{AutoEscape, Environment};
use serde::Serialize;

/// Include template at compile time
const TABLE_TEMPLATE: &str = include_str!("../templates/table.jinja");

/// Data context for the table template (cells pre-padded)
#[derive(Debug, Serialize)]
struct TableContext {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    /// Column gap, narrower in dense layouts
    gap: &'static str,
    separator: String,
    summary: String,
    page: usize,
    total_pages: usize,
}

fn alignment(align: Align) -> Alignment {
    match align {
        Align::Left => Alignment::Left,
        Align::Center => Alignment::Center,
        Align::Right => Alignment::Right,
    }
}

/// Header text with the sort arrow when this is the sorted column
fn header_label(header: &HeaderCell) -> String {
    match header.sorted {
        Some(direction) => format!("{} {}", header.label, direction.arrow()),
        None => header.label.clone(),
    }
}

/// Column widths: the widest cell, capped by the column's requested width
fn column_widths(presentation: &Presentation) -> Vec<usize> {
    presentation
        .headers
        .iter()
        .enumerate()
        .map(|(i, header)| {
            let widest = presentation
                .rows
                .iter()
                .filter_map(|row| row.cells.get(i))
                .map(|cell| measure_text_width(cell))
                .chain(std::iter::once(measure_text_width(&header_label(header))))
                .max()
                .unwrap_or(0);
            match header.width {
                Some(width) => widest.min(width.max(1)),
                None => widest,
            }
        })
        .collect()
}

fn fit(text: &str, width: usize, align: Align) -> String {
    let truncated = truncate_str(text, width, "…");
    pad_str(&truncated, width, alignment(align), None).into_owned()
}

fn bold(value: String) -> String {
    Style::new().bold().apply_to(value).to_string()
}

fn dim(value: String) -> String {
    Style::new().dim().apply_to(value).to_string()
}

/// Build the template context from a presentation
fn table_context(presentation: &Presentation) -> TableContext {
    let widths = column_widths(presentation);
    let gap = if presentation.layout.dense { " " } else { "  " };

    let headers = presentation
        .headers
        .iter()
        .zip(&widths)
        .map(|(h, &w)| fit(&header_label(h), w, h.align))
        .collect();
    let rows = presentation
        .rows
        .iter()
        .map(|row| {
            row.cells
                .iter()
                .zip(presentation.headers.iter().zip(&widths))
                .map(|(cell, (h, &w))| fit(cell, w, h.align))
                .collect()
        })
        .collect();
    let rule_width =
        widths.iter().sum::<usize>() + gap.len() * widths.len().saturating_sub(1);

    let info = &presentation.info;
    TableContext {
        headers,
        rows,
        gap,
        separator: "-".repeat(rule_width),
        summary: info.summary(),
        page: info.page,
        total_pages: info.total_pages,
    }
}

/// Render the page as an aligned text table with a summary footer
pub fn render_table(presentation: &Presentation) -> Result<String, minijinja::Error> {
    let mut env = Environment::new();
    env.set_auto_escape_callback(|_| AutoEscape::None);
    env.set_keep_trailing_newline(true);
    env.add_filter("bold", bold);
    env.add_filter("dim", dim);
    env.add_template("table", TABLE_TEMPLATE)?;
    env.get_template("table")?.render(table_context(presentation))
}

#[cfg(test)]
mod tests {
    use super::*;
    use datatablelib::{Column, Row, RowKeySource, TableConfig, TableView};
    use serde_json::json;

    fn sample_view() -> TableView {
        let rows: Vec<Row> = vec![
            json!({"id": 1, "name": "Bob", "total": 3}),
            json!({"id": 2, "name": "Annabelle", "total": 120}),
            json!({"id": 3, "name": "Cy", "total": 7}),
        ]
        .into_iter()
        .filter_map(|v| v.as_object().cloned())
        .collect();
        let columns = vec![
            Column::new("name", "Name"),
            Column::new("total", "Total").align(Align::Right),
        ];
        let mut view = TableView::new(columns, TableConfig::new(), RowKeySource::field("id"));
        view.set_rows(rows);
        view
    }

    #[test]
    fn test_render_aligns_columns() {
        let mut view = sample_view();
        view.toggle_sort("total");
        let out = render_table(&view.presentation()).unwrap();
        let lines: Vec<&str> = out.lines().collect();

        assert!(lines[0].contains("Total ▲"));
        assert!(lines[1].starts_with("---"));
        assert!(lines[2].starts_with("Bob ") && lines[2].ends_with(" 3"));
        assert!(lines[4].starts_with("Annabelle ") && lines[4].ends_with(" 120"));
        assert_eq!(lines[2].len(), lines[4].len());
        assert!(out.contains("Showing 1 to 3 of 3 entries (page 1 of 1)"));
    }

    #[test]
    fn test_render_empty_page() {
        let mut view = sample_view();
        view.input_query("zzz", std::time::Instant::now());
        view.flush_query();
        let out = render_table(&view.presentation()).unwrap();
        assert!(out.contains("No matching entries"));
        assert!(out.contains("Showing 0 to 0 of 0 entries"));
    }

    #[test]
    fn test_width_cap_truncates() {
        let mut view = TableView::new(
            vec![Column::new("name", "Name").width(4)],
            TableConfig::new(),
            RowKeySource::Positional,
        );
        view.set_rows(vec![json!({"name": "Annabelle"})
            .as_object()
            .cloned()
            .unwrap()]);
        let out = render_table(&view.presentation()).unwrap();
        assert!(out.lines().nth(2).unwrap().chars().count() <= 4);
    }

    #[test]
    fn test_cells_are_not_html_escaped() {
        let mut view = TableView::new(
            vec![Column::new("name", "A & B")],
            TableConfig::new(),
            RowKeySource::Positional,
        );
        view.set_rows(vec![json!({"name": "<Bob>"}).as_object().cloned().unwrap()]);
        let out = render_table(&view.presentation()).unwrap();
        assert!(out.contains("A & B"));
        assert!(out.contains("<Bob>"));
    }
}
