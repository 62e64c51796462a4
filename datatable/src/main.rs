//! # datatable
//!
//! A CLI front end for the datatablelib pipeline: search, sort and page
//! through JSON row data, then render, export or print the result.
//!
//! ## Overview
//!
//! datatable loads a JSON array of objects, applies the same view state a
//! table widget would (query, sort column, page, visible columns,
//! selection) and emits the derived rows.
//!
//! ## Features
//!
//! - **View**: Aligned terminal table (default) or the presentation as JSON
//! - **Export**: Every filtered, sorted row as .xlsx or JSON records
//! - **Print**: Standalone HTML page of the printable columns
//! - **Persistent columns**: `--state-id` remembers which columns are shown
//!
//! ## Usage
//!
//! ```bash
//! # First page of a dataset, columns inferred from the first row
//! datatable view people.json
//!
//! # Search and sort, third page of 25
//! datatable view people.json -q oslo -s salary --desc -p 3 -n 25
//!
//! # Column definitions and table options from files
//! datatable view people.json --columns columns.json --config table.json
//!
//! # Show only some columns and remember the choice
//! datatable view people.json --show "name" --show "address.*" --state-id people
//!
//! # Export all matching rows
//! datatable export people.json -q oslo --out people.xlsx
//!
//! # Printable page
//! datatable print people.json --title "Staff" --out staff.html
//! ```

mod logging;
mod render;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use anyhow::{bail, Context as _};
use clap::{Arg, ArgAction, ArgMatches, Command};
use datatablelib::{
    Column, FileStore, HtmlFileSurface, HtmlWriterSurface, JsonWriter, Outcome, PrintSurface, Row,
    RowKey, RowKeySource, SpreadsheetWriter, TableConfig, TableView, XlsxWriter,
};

/// Arguments shared by every subcommand
fn table_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("rows")
            .required(true)
            .help("JSON file holding an array of row objects"),
    )
    .arg(
        Arg::new("columns")
            .long("columns")
            .help("JSON file with column definitions (inferred from the first row otherwise)"),
    )
    .arg(
        Arg::new("config")
            .long("config")
            .help("JSON file with table options"),
    )
    .arg(
        Arg::new("query")
            .short('q')
            .long("query")
            .help("Search text, matched case-insensitively against visible columns"),
    )
    .arg(
        Arg::new("sort")
            .short('s')
            .long("sort")
            .help("Sort by column key"),
    )
    .arg(
        Arg::new("desc")
            .long("desc")
            .action(ArgAction::SetTrue)
            .requires("sort")
            .help("Sort descending"),
    )
    .arg(
        Arg::new("page")
            .short('p')
            .long("page")
            .value_parser(clap::value_parser!(usize))
            .help("Page number (1-based, clamped into range)"),
    )
    .arg(
        Arg::new("page-size")
            .short('n')
            .long("page-size")
            .value_parser(clap::value_parser!(usize))
            .help("Rows per page"),
    )
    .arg(
        Arg::new("key")
            .long("key")
            .default_value("id")
            .help("Field identifying a row (dot-path)"),
    )
    .arg(
        Arg::new("select")
            .long("select")
            .action(ArgAction::Append)
            .help("Mark a row key as selected (can be specified multiple times)"),
    )
    .arg(
        Arg::new("show")
            .long("show")
            .action(ArgAction::Append)
            .help("Show only columns whose key matches glob pattern (can be specified multiple times)"),
    )
    .arg(
        Arg::new("state-id")
            .long("state-id")
            .help("Persist column visibility under this identifier"),
    )
    .arg(
        Arg::new("state-dir")
            .long("state-dir")
            .requires("state-id")
            .help("Directory for persisted column visibility"),
    )
    .arg(
        Arg::new("row-numbers")
            .long("row-numbers")
            .action(ArgAction::SetTrue)
            .help("Prefix rows with their position"),
    )
}

/// Build the clap Command structure
fn build_command() -> Command {
    Command::new("datatable")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Arthur Debert")
        .about("Search, sort, page, export and print JSON row data")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Log pipeline activity to stderr"),
        )
        .subcommand(
            table_args(Command::new("view").about("Show one page of rows")).arg(
                Arg::new("output")
                    .short('o')
                    .long("output")
                    .value_parser(["table", "json"])
                    .default_value("table")
                    .help("Output format"),
            ),
        )
        .subcommand(
            table_args(Command::new("export").about("Write every matching row to a file"))
                .arg(
                    Arg::new("out")
                        .long("out")
                        .required(true)
                        .help("Destination file"),
                )
                .arg(
                    Arg::new("format")
                        .long("format")
                        .value_parser(["xlsx", "json"])
                        .help("File format (defaults to the destination extension, then xlsx)"),
                )
                .arg(
                    Arg::new("visible-only")
                        .long("visible-only")
                        .action(ArgAction::SetTrue)
                        .help("Export only the visible columns"),
                ),
        )
        .subcommand(
            table_args(Command::new("print").about("Render the current page as printable HTML"))
                .arg(
                    Arg::new("title")
                        .long("title")
                        .default_value("Table")
                        .help("Document title"),
                )
                .arg(
                    Arg::new("out")
                        .long("out")
                        .help("Destination file (stdout otherwise)"),
                ),
        )
}

fn read_json<T: serde::de::DeserializeOwned>(path: &str, what: &str) -> anyhow::Result<T> {
    let text =
        fs::read_to_string(path).with_context(|| format!("failed to read {} '{}'", what, path))?;
    serde_json::from_str(&text).with_context(|| format!("invalid {} in '{}'", what, path))
}

fn parse_key(text: &str) -> RowKey {
    text.parse::<i64>()
        .map(RowKey::Number)
        .unwrap_or_else(|_| RowKey::from(text))
}

/// Table options from `--config`, then per-flag overrides
fn build_config(matches: &ArgMatches) -> anyhow::Result<TableConfig> {
    let mut config = match matches.get_one::<String>("config") {
        Some(path) => read_json::<TableConfig>(path, "config")?,
        None => TableConfig::default(),
    };

    if let Some(&size) = matches.get_one::<usize>("page-size") {
        config = config.page_size(size);
    }
    if matches.get_flag("row-numbers") {
        config = config.row_numbers(true);
    }
    if let Some(id) = matches.get_one::<String>("state-id") {
        config = config.persistence_id(id.clone());
    }
    if matches.get_many::<String>("select").is_some() {
        config = config.selectable(true);
    }
    if matches.try_get_one::<bool>("visible-only").ok().flatten() == Some(&true) {
        config = config.export_visible_only(true);
    }
    Ok(config)
}

/// Load the dataset and drive a view to the state the flags describe
fn build_view(matches: &ArgMatches) -> anyhow::Result<TableView> {
    let rows_path = matches
        .get_one::<String>("rows")
        .context("missing rows file")?;
    let rows: Vec<Row> = read_json(rows_path, "rows")?;

    let columns: Vec<Column> = match matches.get_one::<String>("columns") {
        Some(path) => read_json(path, "columns")?,
        None => Column::infer(&rows),
    };
    let key = matches
        .get_one::<String>("key")
        .map(|k| RowKeySource::field(k.as_str()))
        .unwrap_or(RowKeySource::Positional);
    let config = build_config(matches)?;

    let mut view = TableView::new(columns, config, key);
    if matches.get_one::<String>("state-id").is_some() {
        let store = match matches.get_one::<String>("state-dir") {
            Some(dir) => FileStore::new(dir),
            None => FileStore::default_location()?,
        };
        tracing::debug!(dir = %store.dir().display(), "column state store");
        view = view.with_store(store);
    }
    view.set_rows(rows);

    if let Some(patterns) = matches.get_many::<String>("show") {
        let patterns: Vec<&str> = patterns.map(|s| s.as_str()).collect();
        view.show_columns_matching(&patterns)?;
    }

    if let Some(query) = matches.get_one::<String>("query") {
        view.input_query(query, Instant::now());
        view.flush_query();
    }

    if let Some(key) = matches.get_one::<String>("sort") {
        if !view.toggle_sort(key) {
            bail!("cannot sort by '{}': unknown or unsortable column", key);
        }
        if matches.get_flag("desc") {
            view.toggle_sort(key);
        }
    }

    if let Some(keys) = matches.get_many::<String>("select") {
        view.set_selection(keys.map(|k| parse_key(k)));
    }

    if let Some(&page) = matches.get_one::<usize>("page") {
        view.go_to_page(page);
    }

    for event in view.drain_events() {
        tracing::debug!(?event, "table event");
    }
    Ok(view)
}

/// Handler for view command
fn view_handler(matches: &ArgMatches) -> anyhow::Result<()> {
    let view = build_view(matches)?;
    let presentation = view.presentation();
    match matches.get_one::<String>("output").map(String::as_str) {
        Some("json") => println!("{}", serde_json::to_string_pretty(&presentation)?),
        _ => print!("{}", render::render_table(&presentation)?),
    }
    Ok(())
}

/// Writer for `--format`, falling back to the destination extension
fn export_writer(format: Option<&str>, out: &Path) -> Box<dyn SpreadsheetWriter> {
    let format = format
        .map(str::to_string)
        .or_else(|| out.extension().map(|e| e.to_string_lossy().to_lowercase()));
    match format.as_deref() {
        Some("json") => Box::new(JsonWriter),
        _ => Box::new(XlsxWriter),
    }
}

/// Handler for export command
fn export_handler(matches: &ArgMatches) -> anyhow::Result<()> {
    let view = build_view(matches)?;
    let out = matches
        .get_one::<String>("out")
        .map(PathBuf::from)
        .context("missing --out")?;
    let writer = export_writer(matches.get_one::<String>("format").map(|s| s.as_str()), &out);

    match view.export_to(Some(writer.as_ref()), &out)? {
        Outcome::Done => eprintln!(
            "Exported {} rows to {}",
            view.filtered_len(),
            out.display()
        ),
        Outcome::Skipped => eprintln!("Export is disabled for this table"),
    }
    Ok(())
}

/// Handler for print command
fn print_handler(matches: &ArgMatches) -> anyhow::Result<()> {
    let view = build_view(matches)?;
    let title = matches
        .get_one::<String>("title")
        .map(|s| s.as_str())
        .unwrap_or("Table");

    let mut surface: Box<dyn PrintSurface> = match matches.get_one::<String>("out") {
        Some(path) => Box::new(HtmlFileSurface::new(path)),
        None => Box::new(HtmlWriterSurface {
            writer: io::stdout(),
        }),
    };

    if view.print_to(Some(surface.as_mut()), title)? == Outcome::Skipped {
        eprintln!("Print is disabled for this table");
    }
    Ok(())
}

fn main() -> ExitCode {
    let matches = build_command().get_matches();
    logging::init(matches.get_flag("verbose"));

    let result = match matches.subcommand() {
        Some(("view", sub)) => view_handler(sub),
        Some(("export", sub)) => export_handler(sub),
        Some(("print", sub)) => print_handler(sub),
        _ => Err(anyhow::anyhow!("unknown command")),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
