// ABOUTME: Entry storage layer using SQLite
// ABOUTME: Handles CRUD, QR code rotation, and bulk import for entries

use chrono::Utc;
use sqlx::{sqlite::SqliteRow, Row, SqliteConnection, SqlitePool};
use tracing::{debug, info};

use scansheet_core::{generate_code, generate_id, validate_entry_name, validate_notes};
use scansheet_storage::{is_unique_violation, StorageError};

use crate::import::{parse_entries_csv, ImportSummary};
use crate::types::{Entry, EntryCreateInput, EntryDeleteOutcome, EntryUpdateInput};

/// How many times to draw a new code when a generated one is already taken
const CODE_ATTEMPTS: usize = 5;

pub struct EntryStorage {
    pool: SqlitePool,
}

impl EntryStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// List all entries, optionally filtered by a search term
    pub async fn list_entries(&self, search: Option<&str>) -> Result<Vec<Entry>, StorageError> {
        let (entries, _) = self.list_entries_paginated(search, None, None).await?;
        Ok(entries)
    }

    /// List entries ordered by name with pagination.
    /// `search` matches a substring of the name or code, case-insensitively.
    pub async fn list_entries_paginated(
        &self,
        search: Option<&str>,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<(Vec<Entry>, i64), StorageError> {
        debug!(
            "Fetching entries (search: {:?}, limit: {:?}, offset: {:?})",
            search, limit, offset
        );

        let pattern = search
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(like_pattern);

        let filter = if pattern.is_some() {
            " WHERE name LIKE ?1 ESCAPE '\\' OR code LIKE ?1 ESCAPE '\\'"
        } else {
            ""
        };

        let count_query = format!("SELECT COUNT(*) FROM entries{}", filter);
        let mut count = sqlx::query_scalar::<_, i64>(&count_query);
        if let Some(p) = &pattern {
            count = count.bind(p);
        }
        let total = count.fetch_one(&self.pool).await?;

        let mut query = format!(
            "SELECT * FROM entries{} ORDER BY name COLLATE NOCASE, created_at",
            filter
        );
        if let Some(lim) = limit {
            query.push_str(&format!(" LIMIT {}", lim));
            if let Some(off) = offset {
                query.push_str(&format!(" OFFSET {}", off));
            }
        }

        let mut rows = sqlx::query(&query);
        if let Some(p) = &pattern {
            rows = rows.bind(p);
        }
        let entries = rows
            .fetch_all(&self.pool)
            .await?
            .iter()
            .map(row_to_entry)
            .collect::<Result<Vec<_>, _>>()?;

        Ok((entries, total))
    }

    /// Get a single entry by ID
    pub async fn get_entry(&self, entry_id: &str) -> Result<Entry, StorageError> {
        debug!("Fetching entry: {}", entry_id);

        let row = sqlx::query("SELECT * FROM entries WHERE id = ?")
            .bind(entry_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| StorageError::from_lookup(e, format!("Entry {}", entry_id)))?;

        row_to_entry(&row)
    }

    /// Get an entry by its current QR code
    pub async fn get_entry_by_code(&self, code: &str) -> Result<Option<Entry>, StorageError> {
        debug!("Fetching entry by code: {}", code);

        let row = sqlx::query("SELECT * FROM entries WHERE code = ?")
            .bind(code)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(row_to_entry).transpose()
    }

    /// Fetch the given entries in name order; unknown ids are ignored
    pub async fn get_entries_by_ids(&self, ids: &[String]) -> Result<Vec<Entry>, StorageError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = vec!["?"; ids.len()].join(", ");
        let query = format!(
            "SELECT * FROM entries WHERE id IN ({}) ORDER BY name COLLATE NOCASE, created_at",
            placeholders
        );

        let mut q = sqlx::query(&query);
        for id in ids {
            q = q.bind(id);
        }

        q.fetch_all(&self.pool)
            .await?
            .iter()
            .map(row_to_entry)
            .collect()
    }

    /// Create a new entry with a freshly generated code
    pub async fn create_entry(&self, input: EntryCreateInput) -> Result<Entry, StorageError> {
        let name = validate_entry_name(&input.name)?;
        let notes = validate_notes(input.notes.as_deref())?;

        let mut conn = self.pool.acquire().await?;
        let entry = insert_entry(&mut *conn, name, notes).await?;

        info!("Created entry {} ({})", entry.id, entry.name);
        Ok(entry)
    }

    /// Update an entry's name and/or notes
    pub async fn update_entry(
        &self,
        entry_id: &str,
        input: EntryUpdateInput,
    ) -> Result<Entry, StorageError> {
        debug!("Updating entry: {}", entry_id);

        let current = self.get_entry(entry_id).await?;

        let name = match input.name.as_deref() {
            Some(name) => validate_entry_name(name)?,
            None => current.name,
        };
        let notes = match input.notes.as_deref() {
            Some(notes) => validate_notes(Some(notes))?,
            None => current.notes,
        };

        sqlx::query("UPDATE entries SET name = ?, notes = ?, updated_at = ? WHERE id = ?")
            .bind(&name)
            .bind(&notes)
            .bind(Utc::now())
            .bind(entry_id)
            .execute(&self.pool)
            .await?;

        self.get_entry(entry_id).await
    }

    /// Delete an entry together with every scan recorded for its code
    pub async fn delete_entry(&self, entry_id: &str) -> Result<EntryDeleteOutcome, StorageError> {
        debug!("Deleting entry: {}", entry_id);

        let mut tx = self.pool.begin().await?;

        // Write first so the transaction takes the write lock before reading
        let code: String = sqlx::query_scalar("DELETE FROM entries WHERE id = ? RETURNING code")
            .bind(entry_id)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| StorageError::from_lookup(e, format!("Entry {}", entry_id)))?;

        let scans_removed = sqlx::query("DELETE FROM scans WHERE code = ?")
            .bind(&code)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        tx.commit().await?;

        info!(
            "Deleted entry {} and {} scan(s)",
            entry_id, scans_removed
        );

        Ok(EntryDeleteOutcome {
            entry_id: entry_id.to_string(),
            scans_removed,
        })
    }

    /// Replace an entry's QR code and carry the new code over to its scans.
    /// The old badge stops resolving once this commits.
    pub async fn regenerate_code(&self, entry_id: &str) -> Result<Entry, StorageError> {
        debug!("Regenerating code for entry: {}", entry_id);

        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        // Touch the row first so the transaction holds the write lock before it reads
        let old_code: String = sqlx::query_scalar(
            "UPDATE entries SET updated_at = ? WHERE id = ? RETURNING code",
        )
        .bind(now)
        .bind(entry_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| StorageError::from_lookup(e, format!("Entry {}", entry_id)))?;

        let mut new_code = None;
        for _ in 0..CODE_ATTEMPTS {
            let candidate = generate_code();
            let result = sqlx::query("UPDATE entries SET code = ?, updated_at = ? WHERE id = ?")
                .bind(&candidate)
                .bind(now)
                .bind(entry_id)
                .execute(&mut *tx)
                .await;

            match result {
                Ok(_) => {
                    new_code = Some(candidate);
                    break;
                }
                Err(e) if is_unique_violation(&e) => continue,
                Err(e) => return Err(e.into()),
            }
        }

        let new_code = new_code.ok_or_else(|| {
            StorageError::Database("Could not generate a unique code".to_string())
        })?;

        let moved = sqlx::query("UPDATE scans SET code = ? WHERE code = ?")
            .bind(&new_code)
            .bind(&old_code)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        tx.commit().await?;

        info!(
            "Rotated code for entry {} ({} scan(s) updated)",
            entry_id, moved
        );

        self.get_entry(entry_id).await
    }

    /// Import entries from CSV content. Valid rows are inserted atomically;
    /// invalid and blank rows are reported in the summary.
    pub async fn import_csv(&self, content: &str) -> Result<ImportSummary, StorageError> {
        let (rows, skipped, errors) = parse_entries_csv(content)?;

        debug!(
            "Importing {} entr(ies) ({} skipped, {} invalid)",
            rows.len(),
            skipped,
            errors.len()
        );

        let mut tx = self.pool.begin().await?;
        let mut created = Vec::with_capacity(rows.len());
        for row in rows {
            created.push(insert_entry(&mut *tx, row.name, row.notes).await?);
        }
        tx.commit().await?;

        info!("Imported {} entr(ies)", created.len());

        Ok(ImportSummary {
            created,
            skipped,
            errors,
        })
    }
}

/// Insert an entry, drawing a new code on collision
async fn insert_entry(
    conn: &mut SqliteConnection,
    name: String,
    notes: Option<String>,
) -> Result<Entry, StorageError> {
    let id = generate_id("ent");
    let now = Utc::now();

    for _ in 0..CODE_ATTEMPTS {
        let code = generate_code();
        let result = sqlx::query(
            r#"
            INSERT INTO entries (id, name, code, notes, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&name)
        .bind(&code)
        .bind(&notes)
        .bind(now)
        .bind(now)
        .execute(&mut *conn)
        .await;

        match result {
            Ok(_) => {
                return Ok(Entry {
                    id,
                    name,
                    code,
                    notes,
                    created_at: now,
                    updated_at: now,
                })
            }
            Err(e) if is_unique_violation(&e) => continue,
            Err(e) => return Err(e.into()),
        }
    }

    Err(StorageError::Database(
        "Could not generate a unique code".to_string(),
    ))
}

/// Escape LIKE wildcards and wrap the term for a substring match
fn like_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

/// Convert a database row to an Entry
fn row_to_entry(row: &SqliteRow) -> Result<Entry, StorageError> {
    Ok(Entry {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        code: row.try_get("code")?,
        notes: row.try_get("notes")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}
