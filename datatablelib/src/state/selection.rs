//! Row selection by key.
//!
//! Selection is independent of filtering, sorting and paging: a key stays
//! selected when its row leaves the page or is filtered out. Keys of rows
//! that no longer exist are kept, not purged.

use std::collections::BTreeSet;

use crate::data::RowKey;

/// Set of selected row keys.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Selection {
    keys: BTreeSet<RowKey>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_keys(keys: impl IntoIterator<Item = RowKey>) -> Self {
        Self {
            keys: keys.into_iter().collect(),
        }
    }

    pub fn contains(&self, key: &RowKey) -> bool {
        self.keys.contains(key)
    }

    /// Flip one key. Returns whether it is now selected.
    pub fn toggle(&mut self, key: RowKey) -> bool {
        if self.keys.remove(&key) {
            false
        } else {
            self.keys.insert(key);
            true
        }
    }

    /// Every key on the page selected? False for an empty page.
    pub fn all_selected(&self, page_keys: &[RowKey]) -> bool {
        !page_keys.is_empty() && page_keys.iter().all(|k| self.keys.contains(k))
    }

    /// Deselect the page when it is fully selected, otherwise select it.
    pub fn toggle_page(&mut self, page_keys: &[RowKey]) {
        if self.all_selected(page_keys) {
            for key in page_keys {
                self.keys.remove(key);
            }
        } else {
            self.keys.extend(page_keys.iter().cloned());
        }
    }

    pub fn replace(&mut self, keys: impl IntoIterator<Item = RowKey>) {
        self.keys = keys.into_iter().collect();
    }

    /// Selected keys in key order.
    pub fn keys(&self) -> Vec<RowKey> {
        self.keys.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
