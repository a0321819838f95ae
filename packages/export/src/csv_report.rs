// ABOUTME: CSV attendance report writer
// ABOUTME: One row per scan plus the download filename for a filtered export

use chrono::{Local, NaiveDate};
use csv::Writer;
use tracing::debug;

use scansheet_scans::Scan;

use crate::error::{ExportError, ExportResult};

pub const CSV_HEADER: [&str; 6] = ["Date", "Time", "Category", "Name", "Code", "Source"];

/// Shown when a scan's code no longer matches an entry
pub(crate) const UNKNOWN_ENTRY: &str = "(unknown)";

/// Write scans as CSV, in the order given
pub fn write_scans_csv(scans: &[Scan]) -> ExportResult<Vec<u8>> {
    debug!("Writing {} scan(s) as CSV", scans.len());

    let mut writer = Writer::from_writer(Vec::new());
    writer.write_record(CSV_HEADER)?;

    for scan in scans {
        let date = scan.scan_date.format("%Y-%m-%d").to_string();
        let time = scan_time(scan);
        let source = scan.source.to_string();
        writer.write_record([
            date.as_str(),
            time.as_str(),
            scan.category_name.as_str(),
            scan.entry_name.as_deref().unwrap_or(UNKNOWN_ENTRY),
            scan.code.as_str(),
            source.as_str(),
        ])?;
    }

    writer
        .into_inner()
        .map_err(|e| ExportError::Io(e.into_error()))
}

/// Local wall-clock time of a scan
pub(crate) fn scan_time(scan: &Scan) -> String {
    scan.scanned_at
        .with_timezone(&Local)
        .format("%H:%M:%S")
        .to_string()
}

/// Download filename such as `scansheet-2024-09-03-chemistry-101.csv`
pub fn export_filename(date: Option<NaiveDate>, category: Option<&str>, extension: &str) -> String {
    let mut parts = vec!["scansheet".to_string()];
    if let Some(date) = date {
        parts.push(date.format("%Y-%m-%d").to_string());
    }
    if let Some(slug) = category.map(slugify).filter(|s| !s.is_empty()) {
        parts.push(slug);
    }
    if parts.len() == 1 {
        parts.push("all".to_string());
    }
    format!("{}.{}", parts.join("-"), extension)
}

fn slugify(value: &str) -> String {
    let mut slug = String::new();
    for c in value.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    slug.trim_end_matches('-').to_string()
}
