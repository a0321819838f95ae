// ABOUTME: Scan storage layer using SQLite
// ABOUTME: Records attendance, lists scans with filters, and summarizes scan dates

use chrono::{Local, NaiveDate, Utc};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use tracing::{debug, info};

use scansheet_core::{generate_id, validate_code, GENERAL_CATEGORY_ID};
use scansheet_storage::{is_unique_violation, StorageError};

use crate::types::{RecordScanInput, Scan, ScanDate, ScanFilter, ScanOrder, ScanSource};

const SELECT_SCAN: &str = r#"
    SELECT s.id, s.code, s.category_id, c.name AS category_name,
           e.id AS entry_id, e.name AS entry_name,
           s.scan_date, s.scanned_at, s.source
    FROM scans s
    JOIN categories c ON c.id = s.category_id
    LEFT JOIN entries e ON e.code = s.code
"#;

pub struct ScanStorage {
    pool: SqlitePool,
}

impl ScanStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Record a scan for an entry under a category and date.
    ///
    /// Exactly one of `code` (badge scan) or `entry_id` (manual mark) must be
    /// set. An entry is recorded at most once per category per day.
    pub async fn record_scan(&self, input: RecordScanInput) -> Result<Scan, StorageError> {
        let (entry_row, source) = match (input.code.as_deref(), input.entry_id.as_deref()) {
            (Some(code), None) => {
                let code = validate_code(code)?;
                let row = sqlx::query("SELECT id, name, code FROM entries WHERE code = ?")
                    .bind(&code)
                    .fetch_one(&self.pool)
                    .await
                    .map_err(|e| {
                        StorageError::from_lookup(e, format!("Entry with code {}", code))
                    })?;
                (row, ScanSource::Qr)
            }
            (None, Some(entry_id)) => {
                let row = sqlx::query("SELECT id, name, code FROM entries WHERE id = ?")
                    .bind(entry_id)
                    .fetch_one(&self.pool)
                    .await
                    .map_err(|e| StorageError::from_lookup(e, format!("Entry {}", entry_id)))?;
                (row, ScanSource::Manual)
            }
            _ => {
                return Err(StorageError::InvalidInput(
                    "Provide either a code or an entry id".to_string(),
                ))
            }
        };

        let entry_name: String = entry_row.try_get("name")?;
        let code: String = entry_row.try_get("code")?;

        let category_id = input
            .category_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .unwrap_or(GENERAL_CATEGORY_ID)
            .to_string();

        let category_name: String = sqlx::query_scalar("SELECT name FROM categories WHERE id = ?")
            .bind(&category_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| StorageError::from_lookup(e, format!("Category {}", category_id)))?;

        let scan_date = input.date.unwrap_or_else(|| Local::now().date_naive());
        let scan_id = generate_id("scan");

        debug!(
            "Recording {} scan for {} in {} on {}",
            source, code, category_id, scan_date
        );

        sqlx::query(
            r#"
            INSERT INTO scans (id, code, category_id, scan_date, scanned_at, source)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&scan_id)
        .bind(&code)
        .bind(&category_id)
        .bind(scan_date)
        .bind(Utc::now())
        .bind(source.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                StorageError::Conflict(format!(
                    "{} is already recorded in {} on {}",
                    entry_name, category_name, scan_date
                ))
            } else {
                StorageError::Sqlx(e)
            }
        })?;

        info!(
            "Recorded scan {} for {} in {} on {}",
            scan_id, entry_name, category_name, scan_date
        );

        self.get_scan(&scan_id).await
    }

    /// Get a single scan by ID
    pub async fn get_scan(&self, scan_id: &str) -> Result<Scan, StorageError> {
        debug!("Fetching scan: {}", scan_id);

        let query = format!("{} WHERE s.id = ?", SELECT_SCAN);
        let row = sqlx::query(&query)
            .bind(scan_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| StorageError::from_lookup(e, format!("Scan {}", scan_id)))?;

        row_to_scan(&row)
    }

    /// List every scan matching the filter
    pub async fn list_scans(
        &self,
        filter: &ScanFilter,
        order: ScanOrder,
    ) -> Result<Vec<Scan>, StorageError> {
        let (scans, _) = self
            .list_scans_paginated(filter, order, None, None)
            .await?;
        Ok(scans)
    }

    /// List scans matching the filter with pagination
    pub async fn list_scans_paginated(
        &self,
        filter: &ScanFilter,
        order: ScanOrder,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<(Vec<Scan>, i64), StorageError> {
        debug!(
            "Fetching scans ({:?}, order: {:?}, limit: {:?}, offset: {:?})",
            filter, order, limit, offset
        );

        let (where_clause, binds) = build_filter(filter)?;

        let count_query = format!("SELECT COUNT(*) FROM scans s{}", where_clause);
        let mut count = sqlx::query_scalar::<_, i64>(&count_query);
        for value in &binds {
            count = count.bind(value);
        }
        let total = count.fetch_one(&self.pool).await?;

        let order_by = match order {
            ScanOrder::Newest => " ORDER BY s.scan_date DESC, s.scanned_at DESC",
            ScanOrder::Report => {
                " ORDER BY s.scan_date, c.name COLLATE NOCASE, e.name COLLATE NOCASE, s.scanned_at"
            }
        };

        let mut query = format!("{}{}{}", SELECT_SCAN, where_clause, order_by);
        if let Some(lim) = limit {
            query.push_str(&format!(" LIMIT {}", lim));
            if let Some(off) = offset {
                query.push_str(&format!(" OFFSET {}", off));
            }
        }

        let mut rows = sqlx::query(&query);
        for value in &binds {
            rows = rows.bind(value);
        }

        let scans = rows
            .fetch_all(&self.pool)
            .await?
            .iter()
            .map(row_to_scan)
            .collect::<Result<Vec<_>, _>>()?;

        Ok((scans, total))
    }

    /// Distinct scan dates with counts, newest first
    pub async fn list_dates(&self, category_id: Option<&str>) -> Result<Vec<ScanDate>, StorageError> {
        debug!("Fetching scan dates (category: {:?})", category_id);

        let rows = match category_id {
            Some(id) => {
                sqlx::query(
                    "SELECT scan_date, COUNT(*) AS count FROM scans WHERE category_id = ?
                     GROUP BY scan_date ORDER BY scan_date DESC",
                )
                .bind(id)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query(
                    "SELECT scan_date, COUNT(*) AS count FROM scans
                     GROUP BY scan_date ORDER BY scan_date DESC",
                )
                .fetch_all(&self.pool)
                .await?
            }
        };

        rows.iter()
            .map(|row| {
                Ok(ScanDate {
                    date: row.try_get("scan_date")?,
                    count: row.try_get("count")?,
                })
            })
            .collect()
    }

    /// Delete a single scan
    pub async fn delete_scan(&self, scan_id: &str) -> Result<(), StorageError> {
        debug!("Deleting scan: {}", scan_id);

        let affected = sqlx::query("DELETE FROM scans WHERE id = ?")
            .bind(scan_id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        if affected == 0 {
            return Err(StorageError::NotFound(format!("Scan {}", scan_id)));
        }

        Ok(())
    }
}

/// Build the WHERE clause and its bind values for a filter
fn build_filter(filter: &ScanFilter) -> Result<(String, Vec<String>), StorageError> {
    let mut conditions = Vec::new();
    let mut binds = Vec::new();

    if let Some(date) = filter.date {
        conditions.push("s.scan_date = ?");
        binds.push(format_date(date));
    }
    if let Some(category_id) = filter.category_id.as_deref() {
        conditions.push("s.category_id = ?");
        binds.push(category_id.to_string());
    }
    if let Some(code) = filter.code.as_deref() {
        conditions.push("s.code = ?");
        binds.push(validate_code(code)?);
    }

    let clause = if conditions.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", conditions.join(" AND "))
    };

    Ok((clause, binds))
}

fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Convert a database row to a Scan
fn row_to_scan(row: &SqliteRow) -> Result<Scan, StorageError> {
    let source: String = row.try_get("source")?;

    Ok(Scan {
        id: row.try_get("id")?,
        code: row.try_get("code")?,
        category_id: row.try_get("category_id")?,
        category_name: row.try_get("category_name")?,
        entry_id: row.try_get("entry_id")?,
        entry_name: row.try_get("entry_name")?,
        scan_date: row.try_get("scan_date")?,
        scanned_at: row.try_get("scanned_at")?,
        source: source.parse().map_err(StorageError::Database)?,
    })
}
