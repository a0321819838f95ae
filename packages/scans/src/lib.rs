// ABOUTME: Attendance scans for Scansheet
// ABOUTME: Records scans by code or entry, lists them with filters, and summarizes dates

pub mod storage;
pub mod types;

// Re-export main types
pub use storage::ScanStorage;
pub use types::{RecordScanInput, Scan, ScanDate, ScanFilter, ScanOrder, ScanSource};
