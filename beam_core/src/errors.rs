//! # Error Types
//!
//! Structured error types for beam_core. Every failure is fatal to a report
//! run, so each variant carries enough context (field name, file path or log
//! location) for the user to diagnose the problem without a debugger.
//!
//! ## Example
//!
//! ```rust
//! use beam_core::errors::{ReportError, ReportResult};
//!
//! fn require_rows(rows: usize) -> ReportResult<()> {
//!     if rows < 3 {
//!         return Err(ReportError::insufficient_data(rows, 3));
//!     }
//!     Ok(())
//! }
//!
//! assert!(require_rows(2).is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for beam_core operations
pub type ReportResult<T> = Result<T, ReportError>;

/// Pipeline stage an error belongs to, used for user-facing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Load,
    Diagram,
    Assemble,
    Compile,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Load => "load",
            Stage::Diagram => "diagram",
            Stage::Assemble => "assemble",
            Stage::Compile => "compile",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured error type for report generation.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum ReportError {
    /// An input path does not exist
    #[error("File not found: '{path}'")]
    FileNotFound { path: String },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// The data file extension is not a known spreadsheet format
    #[error("Unsupported data file format '{extension}' for '{path}'")]
    UnsupportedFormat { path: String, extension: String },

    /// The spreadsheet could not be parsed
    #[error("Could not read spreadsheet '{path}': {reason}")]
    Spreadsheet { path: String, reason: String },

    /// No header matched any alias of a required field
    #[error("Missing required column '{field}' (found columns: {available})")]
    MissingColumn { field: String, available: String },

    /// Too few complete rows to draw a curve
    #[error("Insufficient data: {rows} complete rows, at least {required} required")]
    InsufficientData { rows: usize, required: usize },

    /// Positions are not usable for interpolation
    #[error("Interpolation failed at row {index}: {reason}")]
    Interpolation { index: usize, reason: String },

    /// The document compiler failed or produced no artifact
    #[error("Compilation failed: {message} (see log: {log_path})")]
    Compilation { message: String, log_path: String },

    /// The settings file is malformed
    #[error("Invalid settings in '{path}': {reason}")]
    InvalidSettings { path: String, reason: String },
}

impl ReportError {
    /// Create a FileNotFound error
    pub fn file_not_found(path: impl Into<String>) -> Self {
        ReportError::FileNotFound { path: path.into() }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        ReportError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a Spreadsheet error
    pub fn spreadsheet(path: impl Into<String>, reason: impl Into<String>) -> Self {
        ReportError::Spreadsheet {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a MissingColumn error
    pub fn missing_column(field: impl Into<String>, available: &[String]) -> Self {
        ReportError::MissingColumn {
            field: field.into(),
            available: if available.is_empty() {
                "none".to_string()
            } else {
                available.join(", ")
            },
        }
    }

    /// Create an InsufficientData error
    pub fn insufficient_data(rows: usize, required: usize) -> Self {
        ReportError::InsufficientData { rows, required }
    }

    /// Create an Interpolation error
    pub fn interpolation(index: usize, reason: impl Into<String>) -> Self {
        ReportError::Interpolation {
            index,
            reason: reason.into(),
        }
    }

    /// Create a Compilation error
    pub fn compilation(message: impl Into<String>, log_path: impl Into<String>) -> Self {
        ReportError::Compilation {
            message: message.into(),
            log_path: log_path.into(),
        }
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            ReportError::FileNotFound { .. } => "FILE_NOT_FOUND",
            ReportError::FileError { .. } => "FILE_ERROR",
            ReportError::UnsupportedFormat { .. } => "UNSUPPORTED_FORMAT",
            ReportError::Spreadsheet { .. } => "SPREADSHEET_ERROR",
            ReportError::MissingColumn { .. } => "MISSING_COLUMN",
            ReportError::InsufficientData { .. } => "INSUFFICIENT_DATA",
            ReportError::Interpolation { .. } => "INTERPOLATION_ERROR",
            ReportError::Compilation { .. } => "COMPILATION_ERROR",
            ReportError::InvalidSettings { .. } => "INVALID_SETTINGS",
        }
    }

    /// The pipeline stage that raised this error
    pub fn stage(&self) -> Stage {
        match self {
            ReportError::FileNotFound { .. }
            | ReportError::UnsupportedFormat { .. }
            | ReportError::Spreadsheet { .. }
            | ReportError::MissingColumn { .. }
            | ReportError::InsufficientData { .. }
            | ReportError::InvalidSettings { .. } => Stage::Load,
            ReportError::Interpolation { .. } => Stage::Diagram,
            ReportError::FileError { .. } => Stage::Assemble,
            ReportError::Compilation { .. } => Stage::Compile,
        }
    }
}
