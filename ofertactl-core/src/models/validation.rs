//! Validation error types and the checks shared by every entity

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// A single field that failed validation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Field is empty when it shouldn't be
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },

    /// Field exceeds maximum length
    #[error("{field} exceeds maximum length of {max} characters")]
    TooLong { field: &'static str, max: usize },

    /// String doesn't match the required format
    #[error("{field}: {reason}")]
    InvalidFormat {
        field: &'static str,
        reason: &'static str,
    },

    /// Invalid enum variant
    #[error("invalid {field} value: '{value}'")]
    InvalidVariant { field: &'static str, value: String },

    /// Number outside its allowed range
    #[error("{field} {reason}")]
    OutOfRange {
        field: &'static str,
        reason: &'static str,
    },

    /// Timestamp must come strictly after another one in the same record
    #[error("{field} must be after {other}")]
    NotAfter {
        field: &'static str,
        other: &'static str,
    },

    /// Timestamp lies further in the future than allowed
    #[error("{field} cannot be more than {max_days} days in the future")]
    TooFarAhead { field: &'static str, max_days: i64 },

    /// Required field absent from the payload
    #[error("{field} is required")]
    Missing { field: &'static str },

    /// Field present with the wrong JSON type
    #[error("{field} must be {expected}")]
    InvalidType {
        field: &'static str,
        expected: &'static str,
    },

    /// Payload could not be read at all
    #[error("{field}: {reason}")]
    Unreadable { field: &'static str, reason: String },
}

impl ValidationError {
    /// Wire name of the offending field.
    pub fn field(&self) -> &'static str {
        match self {
            Self::Empty { field }
            | Self::TooLong { field, .. }
            | Self::InvalidFormat { field, .. }
            | Self::InvalidVariant { field, .. }
            | Self::OutOfRange { field, .. }
            | Self::NotAfter { field, .. }
            | Self::TooFarAhead { field, .. }
            | Self::Missing { field }
            | Self::InvalidType { field, .. }
            | Self::Unreadable { field, .. } => field,
        }
    }
}

/// Machine-readable form of a violation, as sent to clients
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldViolation {
    pub field: &'static str,
    pub message: String,
}

/// Every violation found while validating one record (never empty).
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationErrors(Vec<ValidationError>);

impl ValidationErrors {
    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether any violation concerns `field`.
    pub fn has_field(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field() == field)
    }

    pub fn violations(&self) -> Vec<FieldViolation> {
        self.0
            .iter()
            .map(|e| FieldViolation {
                field: e.field(),
                message: e.to_string(),
            })
            .collect()
    }

    pub fn into_vec(self) -> Vec<ValidationError> {
        self.0
    }
}

impl From<ValidationError> for ValidationErrors {
    fn from(e: ValidationError) -> Self {
        Self(vec![e])
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}", e)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Turn raw input into a record that is safe to store.
///
/// `now` is passed in so that rules relative to the current time stay pure.
pub trait Validate {
    type Output;

    fn validate_at(self, now: DateTime<Utc>) -> Result<Self::Output, ValidationErrors>;

    fn validate(self) -> Result<Self::Output, ValidationErrors>
    where
        Self: Sized,
    {
        self.validate_at(Utc::now())
    }
}

/// Collects violations for one record so that all of them get reported.
#[derive(Debug, Default)]
pub(crate) struct Checks {
    errors: Vec<ValidationError>,
}

impl Checks {
    pub(crate) fn push(&mut self, e: ValidationError) {
        self.errors.push(e);
    }

    /// Trimmed, non-empty text of at most `max` characters.
    pub(crate) fn text(&mut self, field: &'static str, value: &str, max: usize) -> String {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            self.push(ValidationError::Empty { field });
        } else if trimmed.chars().count() > max {
            self.push(ValidationError::TooLong { field, max });
        }
        trimmed.to_owned()
    }

    /// Optional text; blank input counts as absent.
    pub(crate) fn optional_text(
        &mut self,
        field: &'static str,
        value: Option<&str>,
        max: usize,
    ) -> Option<String> {
        let trimmed = value.map(str::trim).filter(|s| !s.is_empty())?;
        if trimmed.chars().count() > max {
            self.push(ValidationError::TooLong { field, max });
        }
        Some(trimmed.to_owned())
    }

    pub(crate) fn reference(&mut self, field: &'static str, id: i64) {
        if id <= 0 {
            self.push(ValidationError::OutOfRange {
                field,
                reason: "must be a positive id",
            });
        }
    }

    pub(crate) fn positive_amount(&mut self, field: &'static str, value: f64) {
        if !value.is_finite() || value <= 0.0 {
            self.push(ValidationError::OutOfRange {
                field,
                reason: "must be greater than 0",
            });
        }
    }

    pub(crate) fn non_negative(&mut self, field: &'static str, value: i64) {
        if value < 0 {
            self.push(ValidationError::OutOfRange {
                field,
                reason: "cannot be negative",
            });
        }
    }

    pub(crate) fn strictly_after(
        &mut self,
        field: &'static str,
        later: DateTime<Utc>,
        other: &'static str,
        earlier: DateTime<Utc>,
    ) {
        if later <= earlier {
            self.push(ValidationError::NotAfter { field, other });
        }
    }

    pub(crate) fn finish<T>(self, value: T) -> Result<T, ValidationErrors> {
        if self.errors.is_empty() {
            Ok(value)
        } else {
            Err(ValidationErrors(self.errors))
        }
    }
}

/// Deserialize a nullable field of a patch: absent stays `None`,
/// `null` becomes `Some(None)`.
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
