//! # CLI Error Type
//!
//! One error type for every command.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  CoreError ────────┐                                                   │
//! │  AcquisitionError ─┤                                                   │
//! │  ImportError ──────┼──► AppError { code, message } ──► main: exit 1   │
//! │  ConfigError ──────┤                                                   │
//! │  io::Error ────────┘                                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use std::fmt;

use gulong_core::CoreError;
use gulong_data::{AcquisitionError, ImportError};

use crate::config::ConfigError;

/// Error returned from a command.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppError {
    /// Machine-readable error code
    pub code: ErrorCode,

    /// Human-readable error message
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Config or pass options rejected; prior state kept
    ValidationError,

    /// Text that should have been a number
    InputError,

    /// Backend snapshot unavailable or malformed
    AcquisitionError,

    /// A CSV file could not be loaded or stored
    ImportError,

    /// Output could not be encoded or written
    ExportError,

    /// Config file unreadable
    ConfigError,
}

impl AppError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        AppError {
            code,
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        AppError::new(ErrorCode::ValidationError, message)
    }

    pub fn export(message: impl Into<String>) -> Self {
        AppError::new(ErrorCode::ExportError, message)
    }
}

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Input(e) => AppError::new(ErrorCode::InputError, e.to_string()),
            CoreError::Domain(e) => AppError::new(ErrorCode::InputError, e.to_string()),
            CoreError::Validation(e) => AppError::validation(e.to_string()),
            CoreError::Export(e) => AppError::export(e),
        }
    }
}

impl From<AcquisitionError> for AppError {
    fn from(err: AcquisitionError) -> Self {
        if let AcquisitionError::Internal(ref detail) = err {
            tracing::error!("Internal database error: {}", detail);
        }
        AppError::new(ErrorCode::AcquisitionError, err.to_string())
    }
}

impl From<ImportError> for AppError {
    fn from(err: ImportError) -> Self {
        match err {
            ImportError::Store(e) => e.into(),
            other => AppError::new(ErrorCode::ImportError, other.to_string()),
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Invalid(e) => AppError::validation(e.to_string()),
            other => AppError::new(ErrorCode::ConfigError, other.to_string()),
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::export(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::export(err.to_string())
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for AppError {}

pub type AppResult<T> = Result<T, AppError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use gulong_core::ValidationError;

    #[test]
    fn test_error_codes() {
        let err: AppError = AcquisitionError::MissingUpdateStamp {
            feed: "competitors".to_string(),
        }
        .into();
        assert_eq!(err.code, ErrorCode::AcquisitionError);

        let err: AppError = ImportError::Store(AcquisitionError::PoolExhausted).into();
        assert_eq!(err.code, ErrorCode::AcquisitionError);

        let err: AppError = CoreError::Validation(ValidationError::Required {
            field: "model".to_string(),
        })
        .into();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[test]
    fn test_serializes_for_scripts() {
        let err = AppError::validation("gp_15 must be below 100");
        let json = serde_json::to_string(&err).unwrap();
        assert_eq!(json, r#"{"code":"VALIDATION_ERROR","message":"gp_15 must be below 100"}"#);
    }
}
