// ABOUTME: Entry type definitions
// ABOUTME: Structures for entries and their create/update inputs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    pub id: String,
    pub name: String,
    pub code: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryCreateInput {
    pub name: String,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntryUpdateInput {
    pub name: Option<String>,
    /// `Some("")` clears the notes
    pub notes: Option<String>,
}

/// What a delete removed
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryDeleteOutcome {
    pub entry_id: String,
    pub scans_removed: u64,
}
