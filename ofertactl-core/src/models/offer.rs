//! Discounted offers on inventory products
//!
//! An offer is valid for a time window `[fecha_inicio, fecha_fin)`; the end
//! must come strictly after the start.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::shape::{FieldKind, FieldSpec, InputShape};
use super::timestamp;
use super::validation::{Checks, Validate, ValidationErrors};

/// Stored offer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Offer {
    pub id: i64,
    #[serde(rename = "producto_id")]
    pub product_id: i64,
    #[serde(rename = "precio_oferta")]
    pub discount_price: f64,
    #[serde(rename = "fecha_inicio")]
    pub starts_at: DateTime<Utc>,
    #[serde(rename = "fecha_fin")]
    pub ends_at: DateTime<Utc>,
}

/// Create/replace payload for an offer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfferDraft {
    #[serde(rename = "producto_id")]
    pub product_id: i64,
    #[serde(rename = "precio_oferta")]
    pub discount_price: f64,
    #[serde(rename = "fecha_inicio", deserialize_with = "timestamp::deserialize")]
    pub starts_at: DateTime<Utc>,
    #[serde(rename = "fecha_fin", deserialize_with = "timestamp::deserialize")]
    pub ends_at: DateTime<Utc>,
}

/// Validated offer
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub struct NewOffer {
    pub product_id: i64,
    pub discount_price: f64,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
}

impl Validate for OfferDraft {
    type Output = NewOffer;

    fn validate_at(self, _now: DateTime<Utc>) -> Result<NewOffer, ValidationErrors> {
        let mut checks = Checks::default();

        checks.reference("producto_id", self.product_id);
        checks.positive_amount("precio_oferta", self.discount_price);
        checks.strictly_after("fecha_fin", self.ends_at, "fecha_inicio", self.starts_at);

        checks.finish(NewOffer {
            product_id: self.product_id,
            discount_price: self.discount_price,
            starts_at: self.starts_at,
            ends_at: self.ends_at,
        })
    }
}

/// Partial update for an offer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OfferPatch {
    #[serde(rename = "producto_id", default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<i64>,
    #[serde(rename = "precio_oferta", default, skip_serializing_if = "Option::is_none")]
    pub discount_price: Option<f64>,
    #[serde(
        rename = "fecha_inicio",
        default,
        deserialize_with = "timestamp::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub starts_at: Option<DateTime<Utc>>,
    #[serde(
        rename = "fecha_fin",
        default,
        deserialize_with = "timestamp::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub ends_at: Option<DateTime<Utc>>,
}

impl OfferPatch {
    pub fn apply(self, current: &Offer) -> OfferDraft {
        OfferDraft {
            product_id: self.product_id.unwrap_or(current.product_id),
            discount_price: self.discount_price.unwrap_or(current.discount_price),
            starts_at: self.starts_at.unwrap_or(current.starts_at),
            ends_at: self.ends_at.unwrap_or(current.ends_at),
        }
    }
}

impl From<NewOffer> for OfferPatch {
    fn from(o: NewOffer) -> Self {
        Self {
            product_id: Some(o.product_id),
            discount_price: Some(o.discount_price),
            starts_at: Some(o.starts_at),
            ends_at: Some(o.ends_at),
        }
    }
}

impl InputShape for OfferDraft {
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::required("producto_id", FieldKind::Integer),
        FieldSpec::required("precio_oferta", FieldKind::Number),
        FieldSpec::required("fecha_inicio", FieldKind::Timestamp),
        FieldSpec::required("fecha_fin", FieldKind::Timestamp),
    ];
}

impl InputShape for OfferPatch {
    const FIELDS: &'static [FieldSpec] = OfferDraft::FIELDS;
    const PARTIAL: bool = true;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ValidationError;
    use chrono::Duration;

    fn draft(start: DateTime<Utc>, end: DateTime<Utc>) -> OfferDraft {
        OfferDraft {
            product_id: 1,
            discount_price: 1.50,
            starts_at: start,
            ends_at: end,
        }
    }

    #[test]
    fn accepts_forward_window() {
        let t = Utc::now();
        let offer = draft(t, t + Duration::hours(6)).validate().unwrap();
        assert_eq!(offer.ends_at - offer.starts_at, Duration::hours(6));
    }

    #[test]
    fn rejects_reversed_window() {
        let t = Utc::now();
        let errs = draft(t, t - Duration::hours(1)).validate().unwrap_err();
        assert_eq!(
            errs.into_vec(),
            vec![ValidationError::NotAfter {
                field: "fecha_fin",
                other: "fecha_inicio"
            }]
        );
    }

    #[test]
    fn rejects_empty_window() {
        let t = Utc::now();
        assert!(draft(t, t).validate().unwrap_err().has_field("fecha_fin"));
    }

    #[test]
    fn rejects_bad_price_and_reference() {
        let t = Utc::now();
        let errs = OfferDraft {
            product_id: 0,
            discount_price: -2.0,
            ..draft(t, t + Duration::minutes(1))
        }
        .validate()
        .unwrap_err();
        assert!(errs.has_field("producto_id"));
        assert!(errs.has_field("precio_oferta"));
    }

    #[test]
    fn patch_cannot_invert_window() {
        let t = Utc::now();
        let current = Offer {
            id: 3,
            product_id: 1,
            discount_price: 1.0,
            starts_at: t,
            ends_at: t + Duration::hours(4),
        };
        let merged = OfferPatch {
            starts_at: Some(t + Duration::hours(5)),
            ..Default::default()
        }
        .apply(&current);
        assert!(merged.validate().unwrap_err().has_field("fecha_fin"));
    }

    #[test]
    fn accepts_timestamps_without_offset() {
        let draft: OfferDraft = serde_json::from_str(
            r#"{"producto_id": 1, "precio_oferta": 1.5,
                "fecha_inicio": "2024-06-01T10:00:00", "fecha_fin": "2024-06-01T16:00:00Z"}"#,
        )
        .unwrap();

        assert_eq!(draft.ends_at - draft.starts_at, Duration::hours(6));
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn patch_timestamp_must_parse() {
        let patch: OfferPatch =
            serde_json::from_str(r#"{"fecha_fin": "2024-06-01 18:30:00"}"#).unwrap();
        assert!(patch.ends_at.is_some());
        assert!(serde_json::from_str::<OfferPatch>(r#"{"fecha_fin": "tarde"}"#).is_err());
    }
}
