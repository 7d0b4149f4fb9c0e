//! Text extraction from document values.
//!
//! Store drivers and hand-edited files sometimes box plain strings in a tagged wrapper
//! (`!Str "Alice"`, `!ObjectId 64f0...`). Everything that needs to show a document value
//! as text goes through [`display_text`] so the unwrapping rule lives in one place.

use serde_yaml::Value;

/// Returns the plain text held by a scalar value.
///
/// Strings, numbers and booleans convert directly. Tagged values are unwrapped; when the
/// wrapped value is not a scalar, the YAML text of the whole tagged value is used instead.
/// Null, sequences and mappings have no text form and yield `None`.
pub fn display_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Tagged(tagged) => display_text(&tagged.value).or_else(|| yaml_text(value)),
        Value::Null | Value::Sequence(_) | Value::Mapping(_) => None,
    }
}

/// Short description of a value's shape, for log messages and errors.
pub fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "sequence",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged value",
    }
}

fn yaml_text(value: &Value) -> Option<String> {
    let rendered = serde_yaml::to_string(value).ok()?;
    let trimmed = rendered.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
