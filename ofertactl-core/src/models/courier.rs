//! Couriers
//!
//! Phone numbers are free-form (`099-876-5432`, `+593 99 876 5432`), but must
//! carry at least 8 digits once separators are stripped.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::shape::{FieldKind, FieldSpec, InputShape};
use super::validation::{nullable, Checks, Validate, ValidationError, ValidationErrors};

/// Maximum length for courier names
pub const MAX_NAME_LEN: usize = 100;

/// Maximum length for the raw phone string
pub const MAX_PHONE_LEN: usize = 20;

/// Minimum number of digits in a phone number
pub const MIN_PHONE_DIGITS: usize = 8;

/// Maximum length for zone labels (Norte, Sur, Centro, ...)
pub const MAX_ZONE_LEN: usize = 50;

/// Stored courier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Courier {
    pub id: i64,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "telefono")]
    pub phone: String,
    #[serde(rename = "zona")]
    pub zone: Option<String>,
}

/// Create/replace payload for a courier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourierDraft {
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "telefono")]
    pub phone: String,
    #[serde(rename = "zona", default)]
    pub zone: Option<String>,
}

/// Validated courier
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub struct NewCourier {
    pub name: String,
    pub phone: String,
    pub zone: Option<String>,
}

/// Count the digit characters in a phone string.
pub fn phone_digits(phone: &str) -> usize {
    phone.chars().filter(char::is_ascii_digit).count()
}

fn check_phone(checks: &mut Checks, phone: &str) -> String {
    let phone = checks.text("telefono", phone, MAX_PHONE_LEN);
    if !phone.is_empty() && phone_digits(&phone) < MIN_PHONE_DIGITS {
        checks.push(ValidationError::InvalidFormat {
            field: "telefono",
            reason: "must contain at least 8 digits",
        });
    }
    phone
}

impl Validate for CourierDraft {
    type Output = NewCourier;

    fn validate_at(self, _now: DateTime<Utc>) -> Result<NewCourier, ValidationErrors> {
        let mut checks = Checks::default();

        let name = checks.text("nombre", &self.name, MAX_NAME_LEN);
        let phone = check_phone(&mut checks, &self.phone);
        let zone = checks.optional_text("zona", self.zone.as_deref(), MAX_ZONE_LEN);

        checks.finish(NewCourier { name, phone, zone })
    }
}

/// Partial update for a courier
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CourierPatch {
    #[serde(rename = "nombre", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "telefono", default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// `null` clears the zone
    #[serde(
        rename = "zona",
        default,
        deserialize_with = "nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub zone: Option<Option<String>>,
}

impl CourierPatch {
    pub fn apply(self, current: &Courier) -> CourierDraft {
        CourierDraft {
            name: self.name.unwrap_or_else(|| current.name.clone()),
            phone: self.phone.unwrap_or_else(|| current.phone.clone()),
            zone: self.zone.unwrap_or_else(|| current.zone.clone()),
        }
    }
}

impl From<NewCourier> for CourierPatch {
    fn from(c: NewCourier) -> Self {
        Self {
            name: Some(c.name),
            phone: Some(c.phone),
            zone: Some(c.zone),
        }
    }
}

impl InputShape for CourierDraft {
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::required("nombre", FieldKind::Text),
        FieldSpec::required("telefono", FieldKind::Text),
        FieldSpec::optional("zona", FieldKind::Text),
    ];
}

impl InputShape for CourierPatch {
    const FIELDS: &'static [FieldSpec] = CourierDraft::FIELDS;
    const PARTIAL: bool = true;
}
