// ABOUTME: Scan type definitions
// ABOUTME: Scans joined with entry/category names, filters, and date summaries

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// How a scan was recorded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanSource {
    /// Badge read by a scanner or camera
    Qr,
    /// Marked by hand from the entry list
    Manual,
}

impl fmt::Display for ScanSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanSource::Qr => write!(f, "qr"),
            ScanSource::Manual => write!(f, "manual"),
        }
    }
}

impl FromStr for ScanSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "qr" => Ok(ScanSource::Qr),
            "manual" => Ok(ScanSource::Manual),
            other => Err(format!("Unknown scan source: {}", other)),
        }
    }
}

/// A scan joined with the names a client needs to render it
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scan {
    pub id: String,
    pub code: String,
    pub category_id: String,
    pub category_name: String,
    pub entry_id: Option<String>,
    pub entry_name: Option<String>,
    pub scan_date: NaiveDate,
    pub scanned_at: DateTime<Utc>,
    pub source: ScanSource,
}

/// Record a scan either from a code or from an entry id
#[derive(Debug, Clone, Default)]
pub struct RecordScanInput {
    pub code: Option<String>,
    pub entry_id: Option<String>,
    /// Defaults to the General category
    pub category_id: Option<String>,
    /// Defaults to today's local date
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default)]
pub struct ScanFilter {
    pub date: Option<NaiveDate>,
    pub category_id: Option<String>,
    pub code: Option<String>,
}

/// Row order for scan listings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ScanOrder {
    /// Most recent first, for the live list
    #[default]
    Newest,
    /// Date, then category, then entry name, for exports
    Report,
}

/// A day that has scans, with how many
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanDate {
    pub date: NaiveDate,
    pub count: i64,
}
