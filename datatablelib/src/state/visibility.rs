//! Visible-column set and its persisted snapshot.

use glob::Pattern;

use crate::data::Column;
use crate::error::DataTableError;
use crate::Result;

/// Compile glob patterns used to pick columns by key.
pub fn compile_patterns(patterns: &[&str]) -> Result<Vec<Pattern>> {
    patterns
        .iter()
        .map(|p| {
            Pattern::new(p).map_err(|e| DataTableError::InvalidGlob {
                pattern: p.to_string(),
                message: e.to_string(),
            })
        })
        .collect()
}

/// Decode a snapshot: a JSON array of column keys.
///
/// Anything else yields `None`.
pub fn parse_snapshot(snapshot: &str) -> Option<Vec<String>> {
    serde_json::from_str::<Vec<String>>(snapshot).ok()
}

/// Keys of the columns currently shown.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ColumnVisibility {
    keys: Vec<String>,
}

impl ColumnVisibility {
    /// Visibility taken from each column's `visible` flag.
    pub fn from_defaults(columns: &[Column]) -> Self {
        Self {
            keys: columns
                .iter()
                .filter(|c| c.visible)
                .map(|c| c.key.clone())
                .collect(),
        }
    }

    /// Visibility from a snapshot, falling back to defaults when there is
    /// none or it cannot be parsed.
    pub fn hydrate(columns: &[Column], snapshot: Option<&str>) -> Self {
        let Some(raw) = snapshot else {
            return Self::from_defaults(columns);
        };
        match parse_snapshot(raw) {
            Some(keys) => Self { keys },
            None => {
                tracing::warn!("ignoring malformed column snapshot");
                Self::from_defaults(columns)
            }
        }
    }

    pub fn is_visible(&self, key: &str) -> bool {
        self.keys.iter().any(|k| k == key)
    }

    /// Flip one column. Returns whether it is now visible.
    pub fn toggle(&mut self, key: &str) -> bool {
        if let Some(pos) = self.keys.iter().position(|k| k == key) {
            self.keys.remove(pos);
            false
        } else {
            self.keys.push(key.to_string());
            true
        }
    }

    /// Every defined column visible?
    pub fn all_visible(&self, columns: &[Column]) -> bool {
        columns.iter().all(|c| self.is_visible(&c.key))
    }

    /// Hide everything when all columns are shown, otherwise show all.
    pub fn toggle_all(&mut self, columns: &[Column]) {
        if self.all_visible(columns) {
            self.keys.clear();
        } else {
            self.keys = columns.iter().map(|c| c.key.clone()).collect();
        }
    }

    /// Show exactly the columns whose key matches any pattern.
    pub fn show_matching(&mut self, columns: &[Column], patterns: &[Pattern]) {
        self.keys = columns
            .iter()
            .filter(|c| patterns.iter().any(|p| p.matches(&c.key)))
            .map(|c| c.key.clone())
            .collect();
    }

    /// Visible columns in header order.
    pub fn visible_columns<'a>(&self, columns: &'a [Column]) -> Vec<&'a Column> {
        columns.iter().filter(|c| self.is_visible(&c.key)).collect()
    }

    /// Visible keys in header order (unknown snapshot keys last).
    pub fn ordered_keys(&self, columns: &[Column]) -> Vec<String> {
        let mut ordered: Vec<String> = self
            .visible_columns(columns)
            .into_iter()
            .map(|c| c.key.clone())
            .collect();
        for key in &self.keys {
            if !ordered.contains(key) {
                ordered.push(key.clone());
            }
        }
        ordered
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// Encode as a snapshot.
    pub fn snapshot(&self, columns: &[Column]) -> Result<String> {
        Ok(serde_json::to_string(&self.ordered_keys(columns))?)
    }
}
