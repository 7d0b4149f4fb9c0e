use gradebook_documents::DocumentError;
use gradebook_types::TextError;
use std::path::PathBuf;
use std::time::Duration;

/// Failures reported by the student collection.
///
/// Not-found on a read is not an error: lookups return `Ok(None)`.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("a student with id '{0}' already exists")]
    Conflict(String),
    #[error("no student with id '{0}'")]
    NotFound(String),
    #[error("store {operation} timed out after {}s", timeout.as_secs_f64())]
    Timeout {
        operation: &'static str,
        timeout: Duration,
    },
    #[error("failed to create storage directory: {0}")]
    StorageDirCreation(std::io::Error),
    #[error("failed to read student document: {0}")]
    FileRead(std::io::Error),
    #[error("failed to write student document: {0}")]
    FileWrite(std::io::Error),
    #[error("failed to delete student document: {0}")]
    FileDelete(std::io::Error),
    #[error("unreadable student document: {0}")]
    Document(#[from] DocumentError),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Failures surfaced by [`crate::StudentService`] to the front ends.
#[derive(Debug, thiserror::Error)]
pub enum GradebookError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("invalid text: {0}")]
    Text(#[from] TextError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(
        "failed to write report (path: {path}): {source}",
        path = path.display()
    )]
    ReportWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid configuration: {0}")]
    Config(String),
}

pub type GradebookResult<T> = std::result::Result<T, GradebookError>;
