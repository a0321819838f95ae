// ABOUTME: Database state shared by API handlers
// ABOUTME: Holds the SQLite pool and one storage layer per domain

use std::sync::Arc;

use sqlx::SqlitePool;
use tracing::info;

use scansheet_categories::CategoryStorage;
use scansheet_entries::EntryStorage;
use scansheet_scans::ScanStorage;
use scansheet_storage::{connect, connect_in_memory, PoolSettings, StorageError};

/// Shared database state for API handlers
#[derive(Clone)]
pub struct DbState {
    pub pool: SqlitePool,
    pub entry_storage: Arc<EntryStorage>,
    pub category_storage: Arc<CategoryStorage>,
    pub scan_storage: Arc<ScanStorage>,
}

impl DbState {
    /// Create database state from an already migrated pool
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            entry_storage: Arc::new(EntryStorage::new(pool.clone())),
            category_storage: Arc::new(CategoryStorage::new(pool.clone())),
            scan_storage: Arc::new(ScanStorage::new(pool.clone())),
            pool,
        }
    }

    /// Open (and migrate) the database file described by `settings`
    pub async fn init(settings: &PoolSettings) -> Result<Self, StorageError> {
        let pool = connect(settings).await?;
        info!("Database ready at {}", settings.path.display());
        Ok(Self::new(pool))
    }

    /// Fresh in-memory database, used by tests and dry runs
    pub async fn in_memory() -> Result<Self, StorageError> {
        Ok(Self::new(connect_in_memory().await?))
    }
}
