//! Unified error types for the datatable-tui application.

use crate::domain::RowId;
use std::path::PathBuf;
use thiserror::Error;

/// Main application error type
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Table error: {0}")]
    Table(#[from] TableError),

    #[error("Dataset error: {0}")]
    Dataset(#[from] DatasetError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Terminal error: {0}")]
    Terminal(String),
}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

/// Errors raised by table snapshot operations.
///
/// The pure row functions never fail; these come from the host-policy
/// checks layered on top of them.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TableError {
    #[error("Duplicate row id: {0}")]
    DuplicateRowId(RowId),

    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    #[error("Column is not sortable: {0}")]
    NotSortable(String),

    #[error("Column is not editable: {0}")]
    NotEditable(String),

    #[error("Drafts reference unknown rows: {}", join_ids(.0))]
    UnknownRowIds(Vec<RowId>),

    #[error("Column has no action: {0}")]
    NotAnAction(String),

    #[error("Row not found: {0}")]
    RowNotFound(RowId),
}

fn join_ids(ids: &[RowId]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Dataset loading errors
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("Dataset file not found: {0}")]
    NotFound(PathBuf),

    #[error("IO error reading dataset: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed dataset: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid column '{label}': {reason}")]
    InvalidColumn { label: String, reason: String },

    #[error("Invalid table: {0}")]
    Table(#[from] TableError),
}

/// Result type alias for the application
pub type Result<T> = std::result::Result<T, AppError>;

/// Result type alias for table operations
pub type TableResult<T> = std::result::Result<T, TableError>;

/// Result type alias for dataset loading
pub type DatasetResult<T> = std::result::Result<T, DatasetError>;
