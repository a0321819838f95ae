// ABOUTME: Category management for grouping scans by class or event
// ABOUTME: Provides types and storage layer, with scan reassignment on delete

pub mod storage;
pub mod types;

// Re-export main types
pub use storage::CategoryStorage;
pub use types::{Category, CategoryCreateInput, CategoryDeleteOutcome, CategoryUpdateInput};
