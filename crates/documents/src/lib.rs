//! Document boundary support for student records.
//!
//! This crate translates between the loosely-typed documents held in the student
//! collection and the strongly-typed [`gradebook_types::Student`] record:
//! - encoding a record into a `serde_yaml::Value` tree (and YAML text)
//! - decoding a tree back into a record, defaulting any field that is missing or malformed
//!
//! Decoding is deliberately forgiving. Collections may hold hand-edited documents or
//! documents written by an older schema, and a report over partially damaged data is more
//! useful than no report. The only decode failure is a document that is not a record at all.

pub mod student;
pub mod text;

// Re-export facades
pub use student::StudentDocument;

pub use student::{
    AGE_KEY, COURSES_KEY, COURSE_MARKS_KEY, COURSE_NAME_KEY, DEFAULT_COURSE_NAME,
    DEFAULT_STUDENT_ID, DEFAULT_STUDENT_NAME, ID_KEY, NAME_KEY,
};

/// Errors returned by the `gradebook-documents` boundary crate.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("invalid YAML: {0}")]
    InvalidYaml(#[from] serde_yaml::Error),

    #[error("document is not a student record (found {0})")]
    NotARecord(&'static str),

    #[error("failed to serialise student document: {0}")]
    Serialisation(String),
}

/// Type alias for Results that can fail with a [`DocumentError`].
pub type DocumentResult<T> = Result<T, DocumentError>;
