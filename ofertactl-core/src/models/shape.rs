//! Field-level shape checks for JSON input
//!
//! Run before deserialization so that every missing or mistyped field is
//! reported at once, each under its own wire name.

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::timestamp;
use super::validation::{Checks, ValidationError, ValidationErrors};

/// JSON type a field must carry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Integer,
    Number,
    Timestamp,
}

impl FieldKind {
    fn accepts(self, value: &Value) -> bool {
        match self {
            Self::Text => value.is_string(),
            Self::Integer => value.as_i64().is_some(),
            Self::Number => value.is_number(),
            Self::Timestamp => value.as_str().and_then(timestamp::parse).is_some(),
        }
    }

    fn expected(self) -> &'static str {
        match self {
            Self::Text => "a string",
            Self::Integer => "an integer",
            Self::Number => "a number",
            Self::Timestamp => "an ISO 8601 date-time",
        }
    }
}

/// One input field by wire name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

impl FieldSpec {
    pub const fn required(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: true,
        }
    }

    pub const fn optional(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: false,
        }
    }
}

/// A payload type read from a JSON object.
///
/// Patches set `PARTIAL`: nothing is required and `null` is always allowed.
pub trait InputShape: DeserializeOwned {
    const FIELDS: &'static [FieldSpec];
    const PARTIAL: bool = false;

    /// Check every field, then deserialize.
    fn from_json(value: Value) -> Result<Self, ValidationErrors> {
        check_fields(&value, Self::FIELDS, Self::PARTIAL)?;
        serde_json::from_value(value).map_err(|e| {
            ValidationErrors::from(ValidationError::Unreadable {
                field: "body",
                reason: e.to_string(),
            })
        })
    }
}

fn check_fields(value: &Value, fields: &[FieldSpec], partial: bool) -> Result<(), ValidationErrors> {
    let Some(object) = value.as_object() else {
        return Err(ValidationError::InvalidType {
            field: "body",
            expected: "a JSON object",
        }
        .into());
    };

    let mut checks = Checks::default();
    for field in fields {
        match object.get(field.name) {
            None | Some(Value::Null) => {
                if field.required && !partial {
                    checks.push(ValidationError::Missing { field: field.name });
                }
            }
            Some(v) if !field.kind.accepts(v) => checks.push(ValidationError::InvalidType {
                field: field.name,
                expected: field.kind.expected(),
            }),
            Some(_) => {}
        }
    }
    checks.finish(())
}
