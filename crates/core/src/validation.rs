//! Input validation utilities.
//!
//! Student ids double as document filenames, so they are restricted to a conservative
//! character set before they reach the store. The `parse_*` helpers turn raw console
//! input into checked values for the front ends.

use crate::constants::{DEFAULT_REPORT_EXTENSION, MAX_MARKS, MAX_STUDENT_AGE, MAX_STUDENT_ID_LEN};
use crate::{GradebookError, GradebookResult, StoreError, StoreResult};

/// Validates that a student id is safe to use as a document filename.
///
/// - Rejects empty or whitespace-only ids
/// - Bounds the length to [`MAX_STUDENT_ID_LEN`]
/// - Allows only ASCII alphanumerics, `.`, `-` and `_`, and no leading `.`
///
/// # Errors
///
/// Returns a `StoreError::InvalidInput` if the id is invalid.
pub fn validate_student_id(id: &str) -> StoreResult<()> {
    if id.trim().is_empty() {
        return Err(StoreError::InvalidInput("student id cannot be empty".into()));
    }

    if id.len() > MAX_STUDENT_ID_LEN {
        return Err(StoreError::InvalidInput(format!(
            "student id exceeds maximum length of {} characters",
            MAX_STUDENT_ID_LEN
        )));
    }

    if id.starts_with('.') {
        return Err(StoreError::InvalidInput(
            "student id cannot start with '.'".into(),
        ));
    }

    let ok = id
        .bytes()
        .all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'z' | b'A'..=b'Z' | b'.' | b'-' | b'_'));

    if !ok {
        return Err(StoreError::InvalidInput(
            "student id contains invalid characters (only alphanumeric, '.', '-', '_' allowed)"
                .into(),
        ));
    }

    Ok(())
}

/// Parses an age typed at the console.
pub fn parse_age(input: &str) -> GradebookResult<u32> {
    let age = input
        .trim()
        .parse::<u32>()
        .map_err(|_| GradebookError::InvalidInput(format!("'{}' is not a valid age", input.trim())))?;

    if age > MAX_STUDENT_AGE {
        return Err(GradebookError::InvalidInput(format!(
            "age must be at most {MAX_STUDENT_AGE}"
        )));
    }

    Ok(age)
}

/// Parses a course mark typed at the console; must lie in `0..=100`.
pub fn parse_marks(input: &str) -> GradebookResult<f64> {
    let marks = input
        .trim()
        .parse::<f64>()
        .map_err(|_| GradebookError::InvalidInput(format!("'{}' is not a number", input.trim())))?;

    if !marks.is_finite() || !(0.0..=MAX_MARKS).contains(&marks) {
        return Err(GradebookError::InvalidInput(format!(
            "marks must be between 0 and {MAX_MARKS}"
        )));
    }

    Ok(marks)
}

/// Checks a caller-chosen report filename and appends `.txt` when it has no extension.
///
/// Only a bare file name is accepted: path separators, `..` and leading dots are rejected
/// so reports cannot escape the reports directory.
pub fn normalise_report_filename(name: &str) -> GradebookResult<String> {
    let name = name.trim();

    if name.is_empty() {
        return Err(GradebookError::InvalidInput(
            "report filename cannot be empty".into(),
        ));
    }

    if name.contains(|c: char| c == '/' || c == '\\') || name.contains("..") || name.starts_with('.') {
        return Err(GradebookError::InvalidInput(format!(
            "report filename '{name}' must be a plain file name"
        )));
    }

    if name.chars().any(char::is_control) {
        return Err(GradebookError::InvalidInput(
            "report filename contains control characters".into(),
        ));
    }

    if name.contains('.') {
        Ok(name.to_string())
    } else {
        Ok(format!("{name}.{DEFAULT_REPORT_EXTENSION}"))
    }
}
