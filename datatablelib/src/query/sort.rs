//! Sort stage and the cell comparator.
//!
//! Absent cells (missing or null) sort after every defined value, whatever
//! the direction. Defined cells are compared with one strategy chosen for
//! the whole column, the first that every defined cell supports:
//!
//! 1. **Dates**: every cell parses as a date/time instant
//! 2. **Numbers**: every cell is non-blank and coerces to a number once
//!    everything but digits, `.` and `-` is stripped (`"$1,200.50"`)
//! 3. **Text**: case-insensitive natural order (`"item2" < "item10"`)
//!
//! Choosing per column rather than per pair keeps the order total: a
//! version column such as `"1.5"`, `"1.10"`, `"1.7.x"` is ordered as text
//! throughout instead of flipping between numeric and text comparison.
//!
//! Sorting is stable: rows comparing equal keep their filtered order.

use std::cmp::Ordering;
use std::iter::Peekable;
use std::str::Chars;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;

use crate::data::{cell_text, resolve, Column, Row};

use super::options::SortDirection;

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

/// Milliseconds since the epoch if `value` is a string holding a date.
///
/// Numbers are never treated as dates; they fall through to the numeric
/// strategy, which orders them the same way.
pub fn parse_instant(value: &Value) -> Option<i64> {
    let text = value.as_str()?.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.timestamp_millis());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(text) {
        return Some(dt.timestamp_millis());
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, fmt) {
            return Some(dt.and_utc().timestamp_millis());
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(text, fmt) {
            return d
                .and_hms_opt(0, 0, 0)
                .map(|dt| dt.and_utc().timestamp_millis());
        }
    }
    None
}

/// Number left after stripping everything but digits, `.` and `-`.
///
/// Blank text never coerces.
pub fn coerce_number(text: &str) -> Option<f64> {
    if text.trim().is_empty() {
        return None;
    }
    let stripped: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    stripped.parse::<f64>().ok()
}

fn take_digits(chars: &mut Peekable<Chars<'_>>) -> String {
    let mut run = String::new();
    while let Some(c) = chars.peek().copied() {
        if !c.is_ascii_digit() {
            break;
        }
        run.push(c);
        chars.next();
    }
    run
}

fn compare_digit_runs(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

/// Case-insensitive comparison treating digit runs as numbers.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let a = a.to_lowercase();
    let b = b.to_lowercase();
    let mut left = a.chars().peekable();
    let mut right = b.chars().peekable();

    loop {
        match (left.peek().copied(), right.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(l), Some(r)) if l.is_ascii_digit() && r.is_ascii_digit() => {
                let l_run = take_digits(&mut left);
                let r_run = take_digits(&mut right);
                match compare_digit_runs(&l_run, &r_run) {
                    Ordering::Equal => continue,
                    other => return other,
                }
            }
            (Some(l), Some(r)) => {
                left.next();
                right.next();
                match l.cmp(&r) {
                    Ordering::Equal => continue,
                    other => return other,
                }
            }
        }
    }
}

/// Comparison strategy shared by every cell of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortStrategy {
    Instant,
    Number,
    Text,
}

impl SortStrategy {
    /// Strongest strategy supported by every defined value.
    pub fn detect(values: &[&Value]) -> Self {
        if values.iter().all(|v| parse_instant(v).is_some()) {
            SortStrategy::Instant
        } else if values
            .iter()
            .all(|v| coerce_number(&cell_text(Some(v))).is_some())
        {
            SortStrategy::Number
        } else {
            SortStrategy::Text
        }
    }
}

/// Precomputed sort key of one cell.
#[derive(Debug, Clone, PartialEq)]
pub enum SortKey {
    Instant(i64),
    Number(f64),
    Text(String),
    Absent,
}

impl SortKey {
    /// Key for `value` under `strategy`.
    ///
    /// A value the strategy cannot read falls back to text, which orders
    /// after every instant and number.
    pub fn new(value: Option<&Value>, strategy: SortStrategy) -> Self {
        let Some(value) = value.filter(|v| !v.is_null()) else {
            return SortKey::Absent;
        };
        let keyed = match strategy {
            SortStrategy::Instant => parse_instant(value).map(SortKey::Instant),
            SortStrategy::Number => coerce_number(&cell_text(Some(value))).map(SortKey::Number),
            SortStrategy::Text => None,
        };
        keyed.unwrap_or_else(|| SortKey::Text(cell_text(Some(value))))
    }

    fn rank(&self) -> u8 {
        match self {
            SortKey::Instant(_) => 0,
            SortKey::Number(_) => 1,
            SortKey::Text(_) => 2,
            SortKey::Absent => 3,
        }
    }

    /// Ascending order of two defined keys.
    fn ascending(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortKey::Instant(a), SortKey::Instant(b)) => a.cmp(b),
            (SortKey::Number(a), SortKey::Number(b)) => a.total_cmp(b),
            (SortKey::Text(a), SortKey::Text(b)) => natural_cmp(a, b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

/// Compare two keys in the given direction, absent keys last.
pub fn compare_keys(a: &SortKey, b: &SortKey, direction: SortDirection) -> Ordering {
    match (a, b) {
        (SortKey::Absent, SortKey::Absent) => Ordering::Equal,
        (SortKey::Absent, _) => Ordering::Greater,
        (_, SortKey::Absent) => Ordering::Less,
        _ => direction.apply(a.ascending(b)),
    }
}

/// Reorder `indices` by `column`, returning a new vector.
///
/// Without a column the input order is returned unchanged.
pub fn sort_rows(
    rows: &[Row],
    indices: &[usize],
    column: Option<&Column>,
    direction: SortDirection,
) -> Vec<usize> {
    let Some(column) = column else {
        return indices.to_vec();
    };

    let path = column.sort_path();
    let cells: Vec<(usize, Option<&Value>)> = indices
        .iter()
        .map(|&i| (i, rows.get(i).and_then(|row| resolve(row, path))))
        .collect();

    let defined: Vec<&Value> = cells
        .iter()
        .filter_map(|(_, v)| v.filter(|v| !v.is_null()))
        .collect();
    let strategy = SortStrategy::detect(&defined);
    tracing::debug!(column = %column.key, ?strategy, "sorting");

    let mut keyed: Vec<(usize, SortKey)> = cells
        .into_iter()
        .map(|(i, v)| (i, SortKey::new(v, strategy)))
        .collect();
    keyed.sort_by(|a, b| compare_keys(&a.1, &b.1, direction));
    keyed.into_iter().map(|(i, _)| i).collect()
}
