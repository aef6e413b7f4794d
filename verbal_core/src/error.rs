//! Error type shared by every fallible operation in the crate

use thiserror::Error;

#[derive(Debug, Error)]
pub enum VerbalError {
    /// The corpus could not be loaded. Nothing can be generated until it is.
    #[error("Question data unavailable: {0}")]
    DataUnavailable(String),

    #[error("Database error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Import failed: {0}")]
    Import(String),

    #[error("Profile not found: {0}")]
    ProfileNotFound(String),

    #[error("A profile named '{0}' already exists")]
    DuplicateProfile(String),
}

pub type Result<T> = std::result::Result<T, VerbalError>;
