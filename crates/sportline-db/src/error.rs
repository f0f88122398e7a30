//! # Database Error Types
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  sqlx::Error ──► DbError (categorized: lock, constraint, pool, ...)    │
//! │                      │                                                  │
//! │  CoreError ──────────┼──► ServiceError (what services return)          │
//! │                      │                                                  │
//! │                      ▼                                                  │
//! │                  ApiError (apps/api) ──► { success: false, message }   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Lock Contention
//! SQLite reports a held write lock as `SQLITE_BUSY` (5), `SQLITE_BUSY_SNAPSHOT`
//! (517) or `SQLITE_LOCKED` (6). They surface once the connection's lock wait
//! runs out and are mapped to [`DbError::LockTimeout`], which callers may
//! retry.

use sportline_core::{CoreError, ValidationError};
use thiserror::Error;

/// Database operation errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// Entity not found in database.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Unique constraint violation.
    #[error("Duplicate {field}")]
    UniqueViolation { field: String },

    /// CHECK constraint violation (e.g. negative stock).
    #[error("Constraint violated: {0}")]
    CheckViolation(String),

    /// Foreign key constraint violation.
    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// The write lock was not released within the configured lock wait.
    ///
    /// ## When This Occurs
    /// - Two transitions reserve stock at the same branch concurrently
    /// - A POS sale and an order dispatch touch the same inventory row
    #[error("Resource is locked by another transaction, retry later")]
    LockTimeout,

    /// Database connection failed.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Pool exhausted (all connections in use).
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Internal database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    /// Whether retrying the same command may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, DbError::LockTimeout | DbError::PoolExhausted)
    }
}

/// SQLite result codes that mean "someone else holds the lock".
fn is_lock_code(code: &str) -> bool {
    matches!(code, "5" | "6" | "261" | "262" | "517" | "773")
}

/// Convert sqlx errors to DbError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::RowNotFound    → DbError::NotFound
/// BUSY / LOCKED result codes  → DbError::LockTimeout
/// UNIQUE / CHECK / FK         → matching constraint variant
/// sqlx::Error::PoolTimedOut   → DbError::PoolExhausted
/// Other                       → DbError::Internal
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::not_found("Record", "unknown"),

            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();
                let locked = db_err.code().is_some_and(|c| is_lock_code(&c))
                    || msg.contains("database is locked")
                    || msg.contains("database table is locked");

                if locked {
                    DbError::LockTimeout
                } else if let Some(field) = msg.strip_prefix("UNIQUE constraint failed: ") {
                    DbError::UniqueViolation {
                        field: field.to_string(),
                    }
                } else if msg.contains("CHECK constraint failed") {
                    DbError::CheckViolation(msg.to_string())
                } else if msg.contains("FOREIGN KEY constraint failed") {
                    DbError::ForeignKeyViolation {
                        message: msg.to_string(),
                    }
                } else {
                    DbError::QueryFailed(msg.to_string())
                }
            }

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,

            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),

            _ => DbError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;

// =============================================================================
// Service Error
// =============================================================================

/// Error returned by the transactional services and the inventory ledger.
///
/// Business rule violations stay `Core`, infrastructure failures stay `Db`, so
/// the HTTP layer can map each without string matching.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Db(#[from] DbError),
}

impl From<sqlx::Error> for ServiceError {
    fn from(err: sqlx::Error) -> Self {
        ServiceError::Db(err.into())
    }
}

impl From<ValidationError> for ServiceError {
    fn from(err: ValidationError) -> Self {
        ServiceError::Core(err.into())
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lock_codes() {
        assert!(is_lock_code("5"));
        assert!(is_lock_code("517"));
        assert!(is_lock_code("6"));
        assert!(!is_lock_code("19"));
    }

    #[test]
    fn test_retryable() {
        assert!(DbError::LockTimeout.is_retryable());
        assert!(DbError::PoolExhausted.is_retryable());
        assert!(!DbError::not_found("Order", 1).is_retryable());
    }

    #[test]
    fn test_pool_timeout_maps_to_exhausted() {
        let err: DbError = sqlx::Error::PoolTimedOut.into();
        assert!(matches!(err, DbError::PoolExhausted));
    }

    #[test]
    fn test_validation_lifts_into_service_error() {
        let err: ServiceError = ValidationError::required("lines").into();
        assert!(matches!(err, ServiceError::Core(CoreError::Validation(_))));
    }
}
