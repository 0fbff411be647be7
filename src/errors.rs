//! # Application Error Types
//!
//! This module defines the error types used by the ingredient analysis engine.
//! Only catalog loading can fail; text analysis itself is total over any input.

use std::fmt;

/// Errors raised while loading the reference ingredient catalog
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogLoadError {
    /// The catalog resource does not exist
    NotFound(String),
    /// The resource is empty or holds only a header row
    InvalidFormat(String),
    /// The resource exists but could not be read or decoded
    ReadFailed(String),
}

impl fmt::Display for CatalogLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogLoadError::NotFound(path) => {
                write!(f, "[CATALOG_NOT_FOUND] Ingredient catalog not found: {}", path)
            }
            CatalogLoadError::InvalidFormat(msg) => {
                write!(f, "[CATALOG_FORMAT] Invalid ingredient catalog format: {}", msg)
            }
            CatalogLoadError::ReadFailed(msg) => {
                write!(f, "[CATALOG_READ] Failed to read ingredient catalog: {}", msg)
            }
        }
    }
}

impl std::error::Error for CatalogLoadError {}

impl From<std::io::Error> for CatalogLoadError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => CatalogLoadError::NotFound(err.to_string()),
            _ => CatalogLoadError::ReadFailed(err.to_string()),
        }
    }
}

/// General application error type for consistent error handling
#[derive(Debug, Clone, PartialEq)]
pub enum AppError {
    /// Configuration validation errors
    Config(String),
    /// Catalog loading errors
    Catalog(CatalogLoadError),
    /// Internal application errors
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(msg) => write!(f, "[CONFIG] {}", msg),
            AppError::Catalog(err) => write!(f, "[CATALOG] {}", err),
            AppError::Internal(msg) => write!(f, "[INTERNAL] {}", msg),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Catalog(err) => Some(err),
            _ => None,
        }
    }
}

impl From<CatalogLoadError> for AppError {
    fn from(err: CatalogLoadError) -> Self {
        AppError::Catalog(err)
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

/// Standardized error logging utilities
pub mod error_logging {
    use tracing::error;

    /// Log catalog loading errors with the source that failed
    pub fn log_catalog_error(error: &impl std::fmt::Display, operation: &str, source: &str) {
        error!(
            error = %error,
            operation = %operation,
            source = %source,
            "Ingredient catalog operation failed"
        );
    }

    /// Log a rejected engine setting along with the variables it is read from
    pub fn log_config_error(error: &impl std::fmt::Display, variables: &str, operation: &str) {
        error!(
            error = %error,
            variables = %variables,
            operation = %operation,
            "Engine configuration rejected"
        );
    }

    /// Log internal application errors with component context
    pub fn log_internal_error(error: &impl std::fmt::Display, component: &str, operation: &str) {
        error!(
            error = %error,
            component = %component,
            operation = %operation,
            "Internal application error"
        );
    }
}
