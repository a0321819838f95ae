// ABOUTME: Entry management for people and items that carry a QR badge
// ABOUTME: Provides types and storage layer, including code rotation and CSV import

pub mod import;
pub mod storage;
pub mod types;

// Re-export main types
pub use import::{parse_entries_csv, ImportRow, ImportRowError, ImportSummary};
pub use storage::EntryStorage;
pub use types::{Entry, EntryCreateInput, EntryDeleteOutcome, EntryUpdateInput};
