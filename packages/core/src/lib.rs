// ABOUTME: Core types, constants, and utilities for Scansheet
// ABOUTME: Foundational package shared by the storage, export, and API layers

pub mod constants;
pub mod utils;
pub mod validation;

// Re-export constants
pub use constants::{database_file, scansheet_dir, GENERAL_CATEGORY_ID, GENERAL_CATEGORY_NAME};

// Re-export utilities
pub use utils::{generate_code, generate_id, CODE_ALPHABET, CODE_LENGTH};

// Re-export validation
pub use validation::{
    parse_scan_date, truncate, validate_category_name, validate_code, validate_description,
    validate_entry_name, validate_notes, ValidationError,
};
