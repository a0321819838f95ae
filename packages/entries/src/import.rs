// ABOUTME: CSV parsing for bulk entry import
// ABOUTME: Reads a `name` column (and optional `notes`) into validated rows

use std::collections::HashMap;

use serde::Serialize;

use scansheet_core::{validate_entry_name, validate_notes};
use scansheet_storage::StorageError;

use crate::types::Entry;

/// A validated row ready to insert
#[derive(Debug, Clone, PartialEq)]
pub struct ImportRow {
    /// 1-based line number in the source, counting the header
    pub line: usize,
    pub name: String,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportRowError {
    pub line: usize,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImportSummary {
    pub created: Vec<Entry>,
    pub skipped: usize,
    pub errors: Vec<ImportRowError>,
}

/// Parse import CSV content.
///
/// Blank rows are counted as skipped. That includes empty lines between rows,
/// which the CSV reader itself never yields; leading and trailing empty lines
/// are ignored. Rows that fail validation are reported in the returned error
/// list and left out of the rows to insert.
pub fn parse_entries_csv(
    content: &str,
) -> Result<(Vec<ImportRow>, usize, Vec<ImportRowError>), StorageError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| StorageError::InvalidInput(format!("Failed to read CSV headers: {e}")))?
        .clone();

    let header_map: HashMap<String, usize> = headers
        .iter()
        .enumerate()
        .map(|(idx, header)| (header.trim().to_lowercase().replace(' ', "_"), idx))
        .collect();

    let name_idx = *header_map
        .get("name")
        .ok_or_else(|| StorageError::InvalidInput("CSV must have a 'name' column".to_string()))?;
    let notes_idx = header_map.get("notes").copied();

    let mut rows = Vec::new();
    let mut skipped = interior_empty_lines(content);
    let mut errors = Vec::new();

    for (index, record) in reader.records().enumerate() {
        let fallback_line = index + 2;
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                let line = e
                    .position()
                    .map(|p| p.line() as usize)
                    .unwrap_or(fallback_line);
                errors.push(ImportRowError {
                    line,
                    message: format!("Unreadable row: {e}"),
                });
                continue;
            }
        };
        let line = record
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(fallback_line);

        let raw_name = record.get(name_idx).unwrap_or("");
        if raw_name.is_empty() {
            skipped += 1;
            continue;
        }

        let parsed = validate_entry_name(raw_name).and_then(|name| {
            let notes = validate_notes(notes_idx.and_then(|idx| record.get(idx)))?;
            Ok((name, notes))
        });

        match parsed {
            Ok((name, notes)) => rows.push(ImportRow { line, name, notes }),
            Err(e) => errors.push(ImportRowError {
                line,
                message: e.to_string(),
            }),
        }
    }

    Ok((rows, skipped, errors))
}

/// Count empty lines that sit between two non-empty lines, ignoring line
/// breaks inside quoted fields
fn interior_empty_lines(content: &str) -> usize {
    let mut in_quotes = false;
    let mut line_has_text = false;
    let mut seen_text = false;
    let mut pending = 0;
    let mut counted = 0;

    for ch in content.chars() {
        match ch {
            '"' => {
                in_quotes = !in_quotes;
                line_has_text = true;
            }
            '\n' if !in_quotes => {
                if line_has_text {
                    counted += pending;
                    pending = 0;
                    seen_text = true;
                } else if seen_text {
                    pending += 1;
                }
                line_has_text = false;
            }
            '\r' if !in_quotes => {}
            _ => line_has_text = true,
        }
    }

    // A last line without a trailing newline still closes the gap before it
    if line_has_text {
        counted += pending;
    }
    counted
}
