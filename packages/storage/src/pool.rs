// ABOUTME: SQLite connection pool setup
// ABOUTME: Applies pragmas and runs embedded migrations on connect

use std::path::{Path, PathBuf};
use std::time::Duration;

use sqlx::{
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous},
    SqlitePool,
};
use tracing::{debug, info};

use crate::StorageError;

/// Pool settings for a file-backed database
#[derive(Debug, Clone)]
pub struct PoolSettings {
    pub path: PathBuf,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
    /// How long a writer waits for another connection's write lock
    pub busy_timeout: Duration,
}

impl PoolSettings {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            max_connections: 10,
            acquire_timeout: Duration::from_secs(30),
            busy_timeout: Duration::from_secs(5),
        }
    }

    pub fn with_max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections.max(1);
        self
    }
}

/// Open (creating if needed) the database file, configure it, and migrate it
pub async fn connect(settings: &PoolSettings) -> Result<SqlitePool, StorageError> {
    ensure_parent_dir(&settings.path).await?;

    debug!("Connecting to database: {}", settings.path.display());

    let options = SqliteConnectOptions::new()
        .filename(&settings.path)
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Normal)
        .busy_timeout(settings.busy_timeout);

    let pool = SqlitePoolOptions::new()
        .max_connections(settings.max_connections)
        .acquire_timeout(settings.acquire_timeout)
        .connect_with(options)
        .await?;

    info!("Database connection established");

    migrate(&pool).await?;
    Ok(pool)
}

/// Single-connection in-memory database with migrations applied
pub async fn connect_in_memory() -> Result<SqlitePool, StorageError> {
    let options = SqliteConnectOptions::new()
        .in_memory(true)
        .foreign_keys(true);

    // One connection: every pooled connection would otherwise see its own database
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;

    migrate(&pool).await?;
    Ok(pool)
}

/// Run the embedded migrations
pub async fn migrate(pool: &SqlitePool) -> Result<(), StorageError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    debug!("Database migrations completed");
    Ok(())
}

async fn ensure_parent_dir(path: &Path) -> Result<(), StorageError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }
    Ok(())
}
