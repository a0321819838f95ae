// ABOUTME: Category storage layer using SQLite
// ABOUTME: Handles CRUD for categories and moves scans to General on delete

use chrono::Utc;
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use tracing::{debug, info};

use scansheet_core::{
    generate_id, validate_category_name, validate_description, GENERAL_CATEGORY_ID,
    GENERAL_CATEGORY_NAME,
};
use scansheet_storage::StorageError;

use crate::types::{Category, CategoryCreateInput, CategoryDeleteOutcome, CategoryUpdateInput};

const SELECT_CATEGORY: &str = r#"
    SELECT c.id, c.name, c.description, c.created_at,
           (SELECT COUNT(*) FROM scans s WHERE s.category_id = c.id) AS scan_count
    FROM categories c
"#;

pub struct CategoryStorage {
    pool: SqlitePool,
}

impl CategoryStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// List all categories, General first and the rest by name
    pub async fn list_categories(&self) -> Result<Vec<Category>, StorageError> {
        debug!("Fetching categories");

        let query = format!(
            "{} ORDER BY CASE WHEN c.id = ? THEN 0 ELSE 1 END, c.name COLLATE NOCASE",
            SELECT_CATEGORY
        );

        sqlx::query(&query)
            .bind(GENERAL_CATEGORY_ID)
            .fetch_all(&self.pool)
            .await?
            .iter()
            .map(row_to_category)
            .collect()
    }

    /// Get a single category by ID
    pub async fn get_category(&self, category_id: &str) -> Result<Category, StorageError> {
        debug!("Fetching category: {}", category_id);

        let query = format!("{} WHERE c.id = ?", SELECT_CATEGORY);
        let row = sqlx::query(&query)
            .bind(category_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| StorageError::from_lookup(e, format!("Category {}", category_id)))?;

        row_to_category(&row)
    }

    /// Get a category by name (case-insensitive)
    pub async fn get_category_by_name(&self, name: &str) -> Result<Option<Category>, StorageError> {
        debug!("Fetching category by name: {}", name);

        let query = format!("{} WHERE c.name = ? COLLATE NOCASE", SELECT_CATEGORY);
        let row = sqlx::query(&query)
            .bind(name.trim())
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(row_to_category).transpose()
    }

    /// Create a new category
    pub async fn create_category(
        &self,
        input: CategoryCreateInput,
    ) -> Result<Category, StorageError> {
        let name = validate_category_name(&input.name)?;
        let description = validate_description(input.description.as_deref())?;
        let category_id = generate_id("cat");

        debug!("Creating category: {} (name: {})", category_id, name);

        sqlx::query(
            r#"
            INSERT INTO categories (id, name, description, created_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&category_id)
        .bind(&name)
        .bind(&description)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            StorageError::from_write(e, format!("A category named '{}' already exists", name))
        })?;

        info!("Created category {} ({})", category_id, name);

        self.get_category(&category_id).await
    }

    /// Update a category's name and/or description. General keeps its name.
    pub async fn update_category(
        &self,
        category_id: &str,
        input: CategoryUpdateInput,
    ) -> Result<Category, StorageError> {
        debug!("Updating category: {}", category_id);

        let current = self.get_category(category_id).await?;

        let name = match input.name.as_deref() {
            Some(name) => validate_category_name(name)?,
            None => current.name.clone(),
        };
        if current.is_general() && name != current.name {
            return Err(StorageError::InvalidInput(format!(
                "The {} category cannot be renamed",
                GENERAL_CATEGORY_NAME
            )));
        }

        let description = match input.description.as_deref() {
            Some(description) => validate_description(Some(description))?,
            None => current.description,
        };

        sqlx::query("UPDATE categories SET name = ?, description = ? WHERE id = ?")
            .bind(&name)
            .bind(&description)
            .bind(category_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                StorageError::from_write(e, format!("A category named '{}' already exists", name))
            })?;

        self.get_category(category_id).await
    }

    /// Delete a category, moving its scans to General.
    ///
    /// A scan is dropped instead of moved when General already holds a scan
    /// for the same code on the same day, keeping one mark per code, category
    /// and day.
    pub async fn delete_category(
        &self,
        category_id: &str,
    ) -> Result<CategoryDeleteOutcome, StorageError> {
        debug!("Deleting category: {}", category_id);

        if category_id == GENERAL_CATEGORY_ID {
            return Err(StorageError::InvalidInput(format!(
                "The {} category cannot be deleted",
                GENERAL_CATEGORY_NAME
            )));
        }

        // Every statement writes, so the transaction holds the write lock from
        // its first statement and never upgrades a read snapshot
        let mut tx = self.pool.begin().await?;

        let dropped = sqlx::query(
            r#"
            DELETE FROM scans
            WHERE category_id = ?1
              AND EXISTS (
                  SELECT 1 FROM scans g
                  WHERE g.category_id = ?2
                    AND g.code = scans.code
                    AND g.scan_date = scans.scan_date
              )
            "#,
        )
        .bind(category_id)
        .bind(GENERAL_CATEGORY_ID)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        let reassigned = sqlx::query("UPDATE scans SET category_id = ? WHERE category_id = ?")
            .bind(GENERAL_CATEGORY_ID)
            .bind(category_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let deleted = sqlx::query("DELETE FROM categories WHERE id = ?")
            .bind(category_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        if deleted == 0 {
            // Nothing was moved either; dropping `tx` rolls back
            return Err(StorageError::NotFound(format!("Category {}", category_id)));
        }

        tx.commit().await?;

        info!(
            "Deleted category {} ({} scan(s) moved to {}, {} dropped)",
            category_id, reassigned, GENERAL_CATEGORY_NAME, dropped
        );

        Ok(CategoryDeleteOutcome {
            category_id: category_id.to_string(),
            reassigned,
            dropped,
        })
    }
}

/// Convert a database row to a Category
fn row_to_category(row: &SqliteRow) -> Result<Category, StorageError> {
    Ok(Category {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        created_at: row.try_get("created_at")?,
        scan_count: row.try_get("scan_count")?,
    })
}
