//! Field definitions describing the expected shape of a step

use serde_json::Value;
use std::fmt;

use crate::types::as_integer;

/// Declared type of a step field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    /// A whole number (not a numeric-looking string)
    Integer,
    /// Text
    String,
    /// `true` or `false`
    Boolean,
    /// A list whose every element is text
    StringArray,
}

impl FieldType {
    /// Name used in error messages.
    pub fn name(self) -> &'static str {
        match self {
            FieldType::Integer => "integer",
            FieldType::String => "string",
            FieldType::Boolean => "boolean",
            FieldType::StringArray => "array of strings",
        }
    }

    /// Whether `value` has this type.
    pub fn matches(self, value: &Value) -> bool {
        match self {
            FieldType::Integer => as_integer(value).is_some(),
            FieldType::String => value.is_string(),
            FieldType::Boolean => value.is_boolean(),
            FieldType::StringArray => {
                value.as_array().is_some_and(|items| items.iter().all(Value::is_string))
            }
        }
    }
}

/// Inclusive integer range; `None` on either side means unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IntRange {
    pub min: Option<i64>,
    pub max: Option<i64>,
}

impl IntRange {
    /// `[min, max]`
    pub fn between(min: i64, max: i64) -> Self {
        Self { min: Some(min), max: Some(max) }
    }

    /// `[-inf, max]`
    pub fn at_most(max: i64) -> Self {
        Self { min: None, max: Some(max) }
    }

    /// `[min, +inf]`
    pub fn at_least(min: i64) -> Self {
        Self { min: Some(min), max: None }
    }

    /// Whether `value` lies inside the range.
    pub fn contains(&self, value: i64) -> bool {
        self.min.is_none_or(|min| value >= min) && self.max.is_none_or(|max| value <= max)
    }
}

impl fmt::Display for IntRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.min {
            Some(min) => write!(f, "[{}, ", min)?,
            None => f.write_str("[-inf, ")?,
        }
        match self.max {
            Some(max) => write!(f, "{}]", max),
            None => f.write_str("+inf]"),
        }
    }
}

/// One expected step attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDefinition {
    /// Field name
    pub name: &'static str,
    /// Declared type
    pub field_type: FieldType,
    /// Whether the field must be present
    pub required: bool,
    /// Object the field lives in, for nested counters such as `resources/wood`
    pub parent: Option<&'static str>,
    /// Valid range; only consulted for integer fields
    pub range: Option<IntRange>,
}

impl FieldDefinition {
    /// A field that must be present.
    pub fn required(name: &'static str, field_type: FieldType) -> Self {
        Self { name, field_type, required: true, parent: None, range: None }
    }

    /// A field that may be absent.
    pub fn optional(name: &'static str, field_type: FieldType) -> Self {
        Self { name, field_type, required: false, parent: None, range: None }
    }

    /// Nest the field inside `parent`.
    pub fn in_parent(mut self, parent: &'static str) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Attach a valid range.
    pub fn with_range(mut self, range: IntRange) -> Self {
        self.range = Some(range);
        self
    }

    /// Path shown in error messages: `name` or `parent/name`.
    pub fn path(&self) -> String {
        match self.parent {
            Some(parent) => format!("{}/{}", parent, self.name),
            None => self.name.to_string(),
        }
    }
}
