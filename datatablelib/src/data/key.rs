//! Row identity used by selection and list rendering.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::row::{resolve, Row};

/// Identifier of a row: either a number or a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RowKey {
    Number(i64),
    Text(String),
}

impl RowKey {
    /// Build a key from a JSON cell value.
    ///
    /// Integers stay numeric, every other scalar becomes text. Null yields
    /// no key.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::Number(n) => Some(match n.as_i64() {
                Some(i) => RowKey::Number(i),
                None => RowKey::Text(n.to_string()),
            }),
            Value::String(s) => Some(RowKey::Text(s.clone())),
            Value::Bool(b) => Some(RowKey::Text(b.to_string())),
            other => Some(RowKey::Text(other.to_string())),
        }
    }
}

impl fmt::Display for RowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowKey::Number(n) => write!(f, "{}", n),
            RowKey::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for RowKey {
    fn from(n: i64) -> Self {
        RowKey::Number(n)
    }
}

impl From<&str> for RowKey {
    fn from(s: &str) -> Self {
        RowKey::Text(s.to_string())
    }
}

impl From<String> for RowKey {
    fn from(s: String) -> Self {
        RowKey::Text(s)
    }
}

/// Strategy deriving a key from a row.
pub trait KeyResolver {
    fn key(&self, row: &Row) -> Option<RowKey>;
}

impl<F> KeyResolver for F
where
    F: Fn(&Row) -> Option<RowKey>,
{
    fn key(&self, row: &Row) -> Option<RowKey> {
        self(row)
    }
}

/// Where row keys come from.
///
/// `Positional` keys are the row's index in the dataset as supplied. They
/// survive filtering and sorting but change whenever the dataset is
/// replaced, so prefer `Field` or `Custom`.
#[derive(Clone)]
pub enum RowKeySource {
    /// Look the key up under a (dot-path) field
    Field(String),
    /// Caller-supplied resolver
    Custom(Arc<dyn KeyResolver + Send + Sync>),
    /// Index in the source dataset
    Positional,
}

impl RowKeySource {
    pub fn field(path: impl Into<String>) -> Self {
        RowKeySource::Field(path.into())
    }

    pub fn custom(resolver: impl KeyResolver + Send + Sync + 'static) -> Self {
        RowKeySource::Custom(Arc::new(resolver))
    }

    /// Key for `row`, which sits at `index` in the source dataset.
    ///
    /// Rows where the field or resolver yields nothing fall back to their
    /// index.
    pub fn key_for(&self, row: &Row, index: usize) -> RowKey {
        let resolved = match self {
            RowKeySource::Field(path) => resolve(row, path).and_then(RowKey::from_value),
            RowKeySource::Custom(resolver) => resolver.key(row),
            RowKeySource::Positional => None,
        };
        resolved.unwrap_or(RowKey::Number(index as i64))
    }

    pub fn is_positional(&self) -> bool {
        matches!(self, RowKeySource::Positional)
    }
}

impl fmt::Debug for RowKeySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowKeySource::Field(path) => f.debug_tuple("Field").field(path).finish(),
            RowKeySource::Custom(_) => f.write_str("Custom(..)"),
            RowKeySource::Positional => f.write_str("Positional"),
        }
    }
}
