//! Mutable view state kept apart from the row data.
//!
//! - **ColumnVisibility**: which columns are shown, persisted per identifier
//! - **Selection**: selected row keys
//! - **Debouncer**: cancellable timer behind the search box
//! - **TableEvent**: notifications for the owning context

pub mod debounce;
pub mod events;
pub mod selection;
pub mod store;
pub mod visibility;

pub use debounce::Debouncer;
pub use events::TableEvent;
pub use selection::Selection;
pub use store::{FileStore, MemoryStore, SnapshotStore};
pub use visibility::{compile_patterns, ColumnVisibility};
