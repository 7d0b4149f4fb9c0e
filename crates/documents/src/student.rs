//! Student document encoding and defensive decoding.
//!
//! Persisted shape:
//!
//! ```yaml
//! id: S001
//! name: Alice Johnson
//! age: 20
//! courses:
//!   - name: Mathematics
//!     marks: 85.0
//! ```
//!
//! Encoding is total. Decoding resolves every field independently:
//! - text fields fall back to a named default
//! - `age` falls back to `0`, course `marks` to `0.0`
//! - `courses` is read as a typed sequence, then as a generic array, and finally replaced
//!   by a single placeholder course
//!
//! Every fallback is logged with `tracing::warn!`. Only a document that is not a mapping
//! is rejected.

use crate::text::{display_text, value_kind};
use crate::{DocumentError, DocumentResult};
use gradebook_types::{Course, Student};
use serde::Deserialize;
use serde_yaml::{Mapping, Value};

pub const ID_KEY: &str = "id";
pub const NAME_KEY: &str = "name";
pub const AGE_KEY: &str = "age";
pub const COURSES_KEY: &str = "courses";
pub const COURSE_NAME_KEY: &str = "name";
pub const COURSE_MARKS_KEY: &str = "marks";

pub const DEFAULT_STUDENT_ID: &str = "unknown-id";
pub const DEFAULT_STUDENT_NAME: &str = "Unknown Student";
pub const DEFAULT_COURSE_NAME: &str = "Unknown";

/// Student document operations.
///
/// Zero-sized namespace; all methods are associated functions.
pub struct StudentDocument;

impl StudentDocument {
    /// Parse YAML text into a student record.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::InvalidYaml`] if the text is not YAML, or
    /// [`DocumentError::NotARecord`] if the top-level value is not a mapping.
    /// Malformed fields never produce an error.
    pub fn parse(yaml_text: &str) -> DocumentResult<Student> {
        let document: Value = serde_yaml::from_str(yaml_text)?;
        Self::decode(&document)
    }

    /// Render a student record as YAML text.
    pub fn render(student: &Student) -> DocumentResult<String> {
        serde_yaml::to_string(&Self::encode(student))
            .map_err(|e| DocumentError::Serialisation(e.to_string()))
    }

    /// Encode a student record into a document tree.
    pub fn encode(student: &Student) -> Value {
        let courses = student
            .courses()
            .iter()
            .map(|course| {
                let mut entry = Mapping::new();
                entry.insert(COURSE_NAME_KEY.into(), course.name().into());
                entry.insert(COURSE_MARKS_KEY.into(), course.marks().into());
                Value::Mapping(entry)
            })
            .collect::<Vec<_>>();

        let mut document = Mapping::new();
        document.insert(ID_KEY.into(), student.id().into());
        document.insert(NAME_KEY.into(), student.name().into());
        document.insert(AGE_KEY.into(), student.age().into());
        document.insert(COURSES_KEY.into(), Value::Sequence(courses));
        Value::Mapping(document)
    }

    /// Decode a document tree into a student record.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::NotARecord`] if the document (after unwrapping any tag)
    /// is not a mapping.
    pub fn decode(document: &Value) -> DocumentResult<Student> {
        let fields = match untag(document) {
            Value::Mapping(fields) => fields,
            other => return Err(DocumentError::NotARecord(value_kind(other))),
        };

        let id = text_field(fields, ID_KEY, DEFAULT_STUDENT_ID, "student");
        let name = text_field(fields, NAME_KEY, DEFAULT_STUDENT_NAME, &id);
        let age = age_field(fields, &id);
        let courses = courses_field(fields, &id);

        Ok(Student::new(id, name, age, courses))
    }
}

// ============================================================================
// Field extraction (internal)
// ============================================================================

/// Strict shape of a course entry, used for the first decoding attempt.
#[derive(Debug, Deserialize)]
struct CourseWire {
    name: String,
    marks: f64,
}

/// Strips any number of YAML tags, yielding the underlying value.
fn untag(value: &Value) -> &Value {
    match value {
        Value::Tagged(tagged) => untag(&tagged.value),
        other => other,
    }
}

fn present<'a>(fields: &'a Mapping, key: &str) -> Option<&'a Value> {
    fields.get(key).filter(|v| !matches!(v, Value::Null))
}

fn text_field(fields: &Mapping, key: &str, default: &str, owner: &str) -> String {
    match present(fields, key) {
        None => {
            tracing::warn!("{owner}: missing '{key}', using '{default}'");
            default.to_string()
        }
        Some(value) => display_text(value).unwrap_or_else(|| {
            tracing::warn!(
                "{owner}: '{key}' is a {} and cannot be read as text, using '{default}'",
                value_kind(value)
            );
            default.to_string()
        }),
    }
}

fn age_field(fields: &Mapping, owner: &str) -> u32 {
    match present(fields, AGE_KEY) {
        None => {
            tracing::warn!("{owner}: missing '{AGE_KEY}', using 0");
            0
        }
        Some(value) => coerce_age(value).unwrap_or_else(|| {
            tracing::warn!("{owner}: '{AGE_KEY}' value {value:?} is not a valid age, using 0");
            0
        }),
    }
}

fn coerce_age(value: &Value) -> Option<u32> {
    match untag(value) {
        Value::Number(n) => n
            .as_u64()
            .and_then(|v| u32::try_from(v).ok())
            .or_else(|| {
                n.as_f64()
                    .filter(|f| f.fract() == 0.0 && *f >= 0.0 && *f <= f64::from(u32::MAX))
                    .map(|f| f as u32)
            }),
        Value::String(s) => s.trim().parse::<u32>().ok(),
        _ => None,
    }
}

fn coerce_marks(value: &Value) -> Option<f64> {
    let marks = match untag(value) {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    marks.filter(|m| m.is_finite())
}

fn placeholder_course() -> Course {
    Course::new(DEFAULT_COURSE_NAME, 0.0)
}

fn courses_field(fields: &Mapping, owner: &str) -> Vec<Course> {
    let value = match present(fields, COURSES_KEY) {
        Some(value) => value,
        None => {
            tracing::warn!("{owner}: missing '{COURSES_KEY}', using a placeholder course");
            return vec![placeholder_course()];
        }
    };

    if let Value::Sequence(items) = value {
        return typed_courses(value, owner)
            .unwrap_or_else(|| items.iter().map(|item| generic_course(item, owner)).collect());
    }

    match generic_array(value) {
        Some(items) => {
            tracing::warn!(
                "{owner}: '{COURSES_KEY}' stored as a {}, reading it as a generic array",
                value_kind(value)
            );
            items.iter().map(|item| generic_course(item, owner)).collect()
        }
        None => {
            tracing::warn!(
                "{owner}: '{COURSES_KEY}' is a {} and cannot be read, using a placeholder course",
                value_kind(value)
            );
            vec![placeholder_course()]
        }
    }
}

/// First attempt: every entry must match [`CourseWire`] exactly.
fn typed_courses(sequence: &Value, owner: &str) -> Option<Vec<Course>> {
    match serde_path_to_error::deserialize::<_, Vec<CourseWire>>(sequence) {
        Ok(wire) => Some(
            wire.into_iter()
                .map(|c| {
                    let marks = if c.marks.is_finite() {
                        c.marks
                    } else {
                        tracing::warn!("{owner}: course '{}' has non-finite marks, using 0.0", c.name);
                        0.0
                    };
                    Course::new(c.name, marks)
                })
                .collect(),
        ),
        Err(err) => {
            let path = err.path().to_string();
            tracing::warn!(
                "{owner}: courses do not match the typed schema at {path}: {}; decoding entries individually",
                err.into_inner()
            );
            None
        }
    }
}

/// Second attempt source: values that hold an array without being a plain sequence.
fn generic_array(value: &Value) -> Option<Vec<Value>> {
    match value {
        Value::Sequence(items) => Some(items.clone()),
        Value::Tagged(tagged) => generic_array(&tagged.value),
        Value::String(text) => match serde_yaml::from_str::<Value>(text) {
            Ok(Value::Sequence(items)) => Some(items),
            _ => None,
        },
        _ => None,
    }
}

fn generic_course(item: &Value, owner: &str) -> Course {
    let entry = match untag(item) {
        Value::Mapping(entry) => entry,
        other => {
            tracing::warn!(
                "{owner}: course entry is a {}, using a placeholder course",
                value_kind(other)
            );
            return placeholder_course();
        }
    };

    let name = text_field(entry, COURSE_NAME_KEY, DEFAULT_COURSE_NAME, owner);
    let marks = match present(entry, COURSE_MARKS_KEY) {
        None => {
            tracing::warn!("{owner}: course '{name}' has no marks, using 0.0");
            0.0
        }
        Some(value) => coerce_marks(value).unwrap_or_else(|| {
            tracing::warn!("{owner}: course '{name}' marks {value:?} are not numeric, using 0.0");
            0.0
        }),
    };

    Course::new(name, marks)
}
