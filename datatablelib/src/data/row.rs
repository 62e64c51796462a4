//! Row records and dot-path cell resolution.
//!
//! A row is an open JSON object. Cells are addressed by a column key that
//! may reach into nested objects (`"address.city"`) or arrays
//! (`"tags.0"`). Lookups never fail: anything that cannot be resolved is
//! treated as an absent value.

use serde_json::{Map, Value};

/// One record of the dataset: an open key to value mapping.
pub type Row = Map<String, Value>;

/// Resolve a dot-separated path against a row.
///
/// Returns `None` when any segment is missing or when a segment tries to
/// descend into a scalar.
pub fn resolve<'a>(row: &'a Row, path: &str) -> Option<&'a Value> {
    let mut segments = path.split('.');
    let first = segments.next()?;
    let mut current = row.get(first)?;

    for segment in segments {
        current = match current {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }

    Some(current)
}

/// Whether a resolved cell counts as absent (missing or JSON null).
pub fn is_absent(value: Option<&Value>) -> bool {
    matches!(value, None | Some(Value::Null))
}

/// String form of a resolved cell, used for matching and text comparison.
///
/// Absent values become the empty string; strings are returned without
/// quotes; objects and arrays are rendered as compact JSON.
pub fn cell_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_row() -> Row {
        match json!({
            "id": 7,
            "name": "Anna",
            "address": { "city": "Oslo", "zip": null },
            "tags": ["a", "b"]
        }) {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_resolve_top_level() {
        let row = sample_row();
        assert_eq!(resolve(&row, "name"), Some(&json!("Anna")));
    }

    #[test]
    fn test_resolve_nested_object() {
        let row = sample_row();
        assert_eq!(resolve(&row, "address.city"), Some(&json!("Oslo")));
    }

    #[test]
    fn test_resolve_array_index() {
        let row = sample_row();
        assert_eq!(resolve(&row, "tags.1"), Some(&json!("b")));
        assert_eq!(resolve(&row, "tags.9"), None);
        assert_eq!(resolve(&row, "tags.x"), None);
    }

    #[test]
    fn test_resolve_missing_or_through_scalar() {
        let row = sample_row();
        assert_eq!(resolve(&row, "missing"), None);
        assert_eq!(resolve(&row, "name.first"), None);
        assert_eq!(resolve(&row, "address.country"), None);
    }

    #[test]
    fn test_is_absent() {
        let row = sample_row();
        assert!(is_absent(resolve(&row, "address.zip")));
        assert!(is_absent(resolve(&row, "nope")));
        assert!(!is_absent(resolve(&row, "id")));
    }

    #[test]
    fn test_cell_text() {
        let row = sample_row();
        assert_eq!(cell_text(resolve(&row, "id")), "7");
        assert_eq!(cell_text(resolve(&row, "name")), "Anna");
        assert_eq!(cell_text(resolve(&row, "address.zip")), "");
        assert_eq!(cell_text(resolve(&row, "missing")), "");
        assert_eq!(cell_text(resolve(&row, "tags")), r#"["a","b"]"#);
        assert_eq!(cell_text(Some(&json!(true))), "true");
    }
}
