// ABOUTME: Data layer shared by the Scansheet domain packages
// ABOUTME: Storage error type, SQLite pool setup, and embedded migrations

pub mod pool;

use thiserror::Error;

pub use pool::{connect, connect_in_memory, PoolSettings};

/// Storage errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Database error: {0}")]
    Database(String),
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
    #[error("Sqlx error: {0}")]
    Sqlx(#[from] sqlx::Error),
    #[error("Validation error: {0}")]
    Validation(#[from] scansheet_core::ValidationError),
    #[error("{0} not found")]
    NotFound(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

impl StorageError {
    /// Map a row lookup error, turning `RowNotFound` into `NotFound(what)`
    pub fn from_lookup(err: sqlx::Error, what: impl Into<String>) -> Self {
        match err {
            sqlx::Error::RowNotFound => StorageError::NotFound(what.into()),
            other => StorageError::Sqlx(other),
        }
    }

    /// Map a write error, turning UNIQUE constraint failures into `Conflict`
    pub fn from_write(err: sqlx::Error, conflict: impl Into<String>) -> Self {
        if is_unique_violation(&err) {
            StorageError::Conflict(conflict.into())
        } else {
            StorageError::Sqlx(err)
        }
    }
}

/// Whether a sqlx error is a UNIQUE constraint failure
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .map(|db| db.is_unique_violation())
        .unwrap_or(false)
}
