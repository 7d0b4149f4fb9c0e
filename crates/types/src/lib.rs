//! Shared domain types for the gradebook.
//!
//! This crate holds the pieces every other crate agrees on:
//! - [`NonEmptyText`] for user-entered text that must carry content
//! - the grading policy ([`Grade`], [`passed`])
//! - the record model ([`Student`], [`Course`]) and its derived metrics
//!
//! Nothing here performs I/O.

pub mod grading;
pub mod student;

pub use grading::{passed, Grade, PASS_MARK};
pub use student::{average, Course, Student};

/// Errors that can occur when creating validated text types.
#[derive(Debug, thiserror::Error)]
pub enum TextError {
    /// The input text was empty or contained only whitespace
    #[error("Text cannot be empty")]
    Empty,
}

/// A string type that guarantees non-empty content.
///
/// The input is trimmed of leading and trailing whitespace during construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NonEmptyText(String);

impl NonEmptyText {
    /// Creates a new `NonEmptyText` from the given input.
    ///
    /// # Returns
    ///
    /// Returns `Ok(NonEmptyText)` if the trimmed input is non-empty,
    /// or `Err(TextError::Empty)` if it's empty or contains only whitespace.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TextError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the inner string as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the wrapper and returns the owned string.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for NonEmptyText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for NonEmptyText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_surrounding_whitespace() {
        let text = NonEmptyText::new("  Alice Johnson \n").expect("non-empty");
        assert_eq!(text.as_str(), "Alice Johnson");
    }

    #[test]
    fn rejects_whitespace_only() {
        let err = NonEmptyText::new("   \t").expect_err("should reject blank text");
        assert!(matches!(err, TextError::Empty));
    }
}
