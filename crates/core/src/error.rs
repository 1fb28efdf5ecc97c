//! Core Error Types
//!
//! Foundational error type shared across the Interview Coach workspace.
//! Only thiserror + std, so the core crate stays lightweight.
//!
//! The root crate folds these into `AppError`.

use thiserror::Error;

/// Core error type for the Interview Coach workspace.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for core errors
pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
