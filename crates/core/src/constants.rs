//! Constants used throughout the gradebook core crate.
//!
//! Path names, environment variable names and limits live here so the store, the
//! configuration and the front ends agree on them.

/// Default directory for gradebook data when no explicit directory is configured.
pub const DEFAULT_DATA_DIR: &str = "gradebook_data";

/// Directory name (under the data directory) holding the student collection.
pub const STUDENTS_DIR_NAME: &str = "students";

/// Directory name (under the data directory) for saved reports when none is configured.
pub const REPORTS_DIR_NAME: &str = "reports";

/// File extension for student documents.
pub const STUDENT_FILE_EXTENSION: &str = "yaml";

/// Extension appended to report filenames given without one.
pub const DEFAULT_REPORT_EXTENSION: &str = "txt";

/// Default bound on a single store round trip, in seconds.
pub const DEFAULT_STORE_TIMEOUT_SECS: u64 = 10;

/// Largest accepted store timeout, in seconds.
pub const MAX_STORE_TIMEOUT_SECS: u64 = 300;

/// Longest accepted student id.
pub const MAX_STUDENT_ID_LEN: usize = 64;

/// Oldest accepted age for newly entered students.
pub const MAX_STUDENT_AGE: u32 = 150;

/// Highest mark a course can be given on entry.
pub const MAX_MARKS: f64 = 100.0;

/// Environment variable naming the data directory.
pub const DATA_DIR_ENV: &str = "GRADEBOOK_DATA_DIR";

/// Environment variable naming the reports directory.
pub const REPORTS_DIR_ENV: &str = "GRADEBOOK_REPORTS_DIR";

/// Environment variable holding the store timeout in seconds.
pub const STORE_TIMEOUT_ENV: &str = "GRADEBOOK_STORE_TIMEOUT_SECS";
