//! Unified application error type.
//! Every layer (sheets, db, core, cli) returns AppError so the presentation
//! layer can decide how to render each kind in one place.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // Storage
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("Worksheet not found: {0}")]
    WorksheetNotFound(String),

    #[error("Worksheet already exists: {0}")]
    WorksheetExists(String),

    #[error("Range exceeds grid limits of '{sheet}': row {row}, column {col}")]
    OutOfGrid { sheet: String, row: usize, col: usize },

    // ---------------------------
    // Schema / data
    // ---------------------------
    #[error("Missing required columns in '{sheet}': {}", .missing.join(", "))]
    Schema { sheet: String, missing: Vec<String> },

    #[error("Not enough data to build a summary")]
    InsufficientData,

    // ---------------------------
    // Input
    // ---------------------------
    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    #[error("Invalid range: {0}")]
    InvalidRange(String),

    #[error("Unknown player: {0}")]
    UnknownPlayer(String),

    #[error("Invalid category code: {0}")]
    InvalidCategory(String),

    #[error("Invalid comment '{0}': expected NAME=TEXT")]
    InvalidComment(String),

    // ---------------------------
    // Session gate
    // ---------------------------
    #[error("Access denied: a valid --password is required")]
    AccessDenied,

    // ---------------------------
    // Config
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_yaml::Error),

    // ---------------------------
    // Export
    // ---------------------------
    #[error("Export error: {0}")]
    Export(String),
}

/// Coarse classification used by the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Schema,
    InsufficientData,
    StoreIo,
    Input,
    Auth,
    Config,
    Export,
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Io(_)
            | AppError::Db(_)
            | AppError::WorksheetNotFound(_)
            | AppError::WorksheetExists(_)
            | AppError::OutOfGrid { .. } => ErrorKind::StoreIo,
            AppError::Schema { .. } => ErrorKind::Schema,
            AppError::InsufficientData => ErrorKind::InsufficientData,
            AppError::InvalidDate(_)
            | AppError::InvalidRange(_)
            | AppError::UnknownPlayer(_)
            | AppError::InvalidCategory(_)
            | AppError::InvalidComment(_) => ErrorKind::Input,
            AppError::AccessDenied => ErrorKind::Auth,
            AppError::Config(_) | AppError::ConfigParse(_) => ErrorKind::Config,
            AppError::Export(_) => ErrorKind::Export,
        }
    }

    /// `InsufficientData` means "nothing to show", not a failure.
    pub fn is_non_fatal(&self) -> bool {
        self.kind() == ErrorKind::InsufficientData
    }
}

pub type AppResult<T> = Result<T, AppError>;
