//! # Data Error Types
//!
//! Error types for acquisition and import.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  SQLite Error (sqlx::Error)          csv::Error / io::Error             │
//! │       │                                   │                             │
//! │       ▼                                   ▼                             │
//! │  AcquisitionError                    ImportError (with line number)    │
//! │       │                                   │                             │
//! │       └──────────────┬────────────────────┘                             │
//! │                      ▼                                                  │
//! │  AppError (CLI) ← exit message; the session keeps its last good pass   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// The backend snapshot is unavailable or unusable.
///
/// Always fatal to the current pass: no partial table is produced.
#[derive(Debug, Error)]
pub enum AcquisitionError {
    /// Database could not be opened.
    ///
    /// ## When This Occurs
    /// - File permissions issue
    /// - Disk full
    /// - Pool closed
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

    /// Snapshot failed validation (blank or duplicate model, bad date).
    #[error("Malformed snapshot: {reason}")]
    Malformed { reason: String },

    /// No last-update stamp recorded for a source.
    ///
    /// ## When This Occurs
    /// - Database seeded by hand without running `import`
    #[error("No last-update date recorded for '{feed}'")]
    MissingUpdateStamp { feed: String },

    /// Internal database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

impl AcquisitionError {
    pub fn malformed(reason: impl Into<String>) -> Self {
        AcquisitionError::Malformed {
            reason: reason.into(),
        }
    }
}

/// Convert sqlx errors to AcquisitionError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::Database       → QueryFailed (UNIQUE violations → Malformed)
/// sqlx::Error::PoolTimedOut   → PoolExhausted
/// sqlx::Error::PoolClosed     → ConnectionFailed
/// Other                       → Internal
/// ```
impl From<sqlx::Error> for AcquisitionError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();
                if msg.contains("UNIQUE constraint failed") {
                    AcquisitionError::Malformed {
                        reason: msg.to_string(),
                    }
                } else {
                    AcquisitionError::QueryFailed(msg.to_string())
                }
            }

            sqlx::Error::PoolTimedOut => AcquisitionError::PoolExhausted,

            sqlx::Error::PoolClosed => AcquisitionError::ConnectionFailed("Pool is closed".to_string()),

            _ => AcquisitionError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for AcquisitionError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        AcquisitionError::MigrationFailed(err.to_string())
    }
}

/// Result type for data operations.
pub type DataResult<T> = Result<T, AcquisitionError>;

// =============================================================================
// Import Error
// =============================================================================

/// A CSV file could not be loaded.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Failed to open '{path}': {reason}")]
    Io { path: String, reason: String },

    /// Row could not be decoded. `line` is 1-based and counts the header.
    #[error("CSV parse error at line {line}: {reason}")]
    Csv { line: u64, reason: String },

    /// Row decoded but a value is unusable.
    #[error("Line {line}: {field}: {reason}")]
    Invalid { line: u64, field: String, reason: String },

    /// Writing the imported rows failed.
    #[error(transparent)]
    Store(#[from] AcquisitionError),
}

/// Result type for CSV imports.
pub type ImportResult<T> = Result<T, ImportError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_errors_map() {
        assert!(matches!(
            AcquisitionError::from(sqlx::Error::PoolTimedOut),
            AcquisitionError::PoolExhausted
        ));
        assert!(matches!(
            AcquisitionError::from(sqlx::Error::PoolClosed),
            AcquisitionError::ConnectionFailed(_)
        ));
    }

    #[test]
    fn test_messages() {
        let err = AcquisitionError::MissingUpdateStamp {
            feed: "backend".to_string(),
        };
        assert_eq!(err.to_string(), "No last-update date recorded for 'backend'");

        let err = ImportError::Csv {
            line: 3,
            reason: "found record with 2 fields".to_string(),
        };
        assert_eq!(err.to_string(), "CSV parse error at line 3: found record with 2 fields");
    }
}
