// ABOUTME: Category type definitions
// ABOUTME: Structures for categories and their create/update inputs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use scansheet_core::GENERAL_CATEGORY_ID;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    /// Number of scans recorded under this category
    pub scan_count: i64,
}

impl Category {
    /// Whether this is the built-in fallback category
    pub fn is_general(&self) -> bool {
        self.id == GENERAL_CATEGORY_ID
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryCreateInput {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryUpdateInput {
    pub name: Option<String>,
    /// `Some("")` clears the description
    pub description: Option<String>,
}

/// What happened to a deleted category's scans
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDeleteOutcome {
    pub category_id: String,
    /// Scans moved to the General category
    pub reassigned: u64,
    /// Scans dropped because General already had the same code on the same day
    pub dropped: u64,
}
