//! Scheduled deliveries
//!
//! A delivery may not be scheduled more than a year ahead of the moment it
//! is validated.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::shape::{FieldKind, FieldSpec, InputShape};
use super::timestamp;
use super::validation::{nullable, Checks, Validate, ValidationError, ValidationErrors};

/// How far ahead a delivery may be scheduled
pub const MAX_SCHEDULE_AHEAD_DAYS: i64 = 365;

/// Maximum length for delivery notes
pub const MAX_DESCRIPTION_LEN: usize = 500;

/// Stored delivery
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Delivery {
    pub id: i64,
    #[serde(rename = "repartidor_id")]
    pub courier_id: i64,
    #[serde(rename = "fecha")]
    pub scheduled_at: DateTime<Utc>,
    #[serde(rename = "descripcion")]
    pub description: Option<String>,
}

/// Create/replace payload for a delivery
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryDraft {
    #[serde(rename = "repartidor_id")]
    pub courier_id: i64,
    #[serde(rename = "fecha", deserialize_with = "timestamp::deserialize")]
    pub scheduled_at: DateTime<Utc>,
    #[serde(rename = "descripcion", default)]
    pub description: Option<String>,
}

/// Validated delivery
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub struct NewDelivery {
    pub courier_id: i64,
    pub scheduled_at: DateTime<Utc>,
    pub description: Option<String>,
}

impl Validate for DeliveryDraft {
    type Output = NewDelivery;

    fn validate_at(self, now: DateTime<Utc>) -> Result<NewDelivery, ValidationErrors> {
        let mut checks = Checks::default();

        checks.reference("repartidor_id", self.courier_id);
        if self.scheduled_at > now + Duration::days(MAX_SCHEDULE_AHEAD_DAYS) {
            checks.push(ValidationError::TooFarAhead {
                field: "fecha",
                max_days: MAX_SCHEDULE_AHEAD_DAYS,
            });
        }
        let description =
            checks.optional_text("descripcion", self.description.as_deref(), MAX_DESCRIPTION_LEN);

        checks.finish(NewDelivery {
            courier_id: self.courier_id,
            scheduled_at: self.scheduled_at,
            description,
        })
    }
}

/// Partial update for a delivery
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeliveryPatch {
    #[serde(rename = "repartidor_id", default, skip_serializing_if = "Option::is_none")]
    pub courier_id: Option<i64>,
    #[serde(
        rename = "fecha",
        default,
        deserialize_with = "timestamp::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub scheduled_at: Option<DateTime<Utc>>,
    #[serde(
        rename = "descripcion",
        default,
        deserialize_with = "nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<Option<String>>,
}

impl DeliveryPatch {
    pub fn apply(self, current: &Delivery) -> DeliveryDraft {
        DeliveryDraft {
            courier_id: self.courier_id.unwrap_or(current.courier_id),
            scheduled_at: self.scheduled_at.unwrap_or(current.scheduled_at),
            description: self
                .description
                .unwrap_or_else(|| current.description.clone()),
        }
    }
}

impl From<NewDelivery> for DeliveryPatch {
    fn from(d: NewDelivery) -> Self {
        Self {
            courier_id: Some(d.courier_id),
            scheduled_at: Some(d.scheduled_at),
            description: Some(d.description),
        }
    }
}

impl InputShape for DeliveryDraft {
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::required("repartidor_id", FieldKind::Integer),
        FieldSpec::required("fecha", FieldKind::Timestamp),
        FieldSpec::optional("descripcion", FieldKind::Text),
    ];
}

impl InputShape for DeliveryPatch {
    const FIELDS: &'static [FieldSpec] = DeliveryDraft::FIELDS;
    const PARTIAL: bool = true;
}
