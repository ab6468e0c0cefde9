//! Delivery routes
//!
//! A route leaves at `hora_salida`; the arrival is recorded later and, once
//! known, must come strictly after the departure.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::shape::{FieldKind, FieldSpec, InputShape};
use super::timestamp;
use super::validation::{Checks, Validate, ValidationErrors};

/// Maximum length for destinations
pub const MAX_DESTINATION_LEN: usize = 200;

/// Stored route
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Route {
    pub id: i64,
    #[serde(rename = "repartidor_id")]
    pub courier_id: i64,
    #[serde(rename = "destino")]
    pub destination: String,
    #[serde(rename = "hora_salida")]
    pub departs_at: DateTime<Utc>,
    #[serde(rename = "hora_llegada")]
    pub arrives_at: Option<DateTime<Utc>>,
}

/// Create/replace payload for a route
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteDraft {
    #[serde(rename = "repartidor_id")]
    pub courier_id: i64,
    #[serde(rename = "destino")]
    pub destination: String,
    #[serde(rename = "hora_salida", deserialize_with = "timestamp::deserialize")]
    pub departs_at: DateTime<Utc>,
    #[serde(rename = "hora_llegada", default, deserialize_with = "timestamp::optional")]
    pub arrives_at: Option<DateTime<Utc>>,
}

/// Validated route
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub struct NewRoute {
    pub courier_id: i64,
    pub destination: String,
    pub departs_at: DateTime<Utc>,
    pub arrives_at: Option<DateTime<Utc>>,
}

impl Validate for RouteDraft {
    type Output = NewRoute;

    fn validate_at(self, _now: DateTime<Utc>) -> Result<NewRoute, ValidationErrors> {
        let mut checks = Checks::default();

        checks.reference("repartidor_id", self.courier_id);
        let destination = checks.text("destino", &self.destination, MAX_DESTINATION_LEN);
        if let Some(arrives_at) = self.arrives_at {
            checks.strictly_after("hora_llegada", arrives_at, "hora_salida", self.departs_at);
        }

        checks.finish(NewRoute {
            courier_id: self.courier_id,
            destination,
            departs_at: self.departs_at,
            arrives_at: self.arrives_at,
        })
    }
}

/// Partial update for a route
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoutePatch {
    #[serde(rename = "repartidor_id", default, skip_serializing_if = "Option::is_none")]
    pub courier_id: Option<i64>,
    #[serde(rename = "destino", default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    #[serde(
        rename = "hora_salida",
        default,
        deserialize_with = "timestamp::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub departs_at: Option<DateTime<Utc>>,
    /// `null` clears a recorded arrival
    #[serde(
        rename = "hora_llegada",
        default,
        deserialize_with = "timestamp::nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub arrives_at: Option<Option<DateTime<Utc>>>,
}

impl RoutePatch {
    pub fn apply(self, current: &Route) -> RouteDraft {
        RouteDraft {
            courier_id: self.courier_id.unwrap_or(current.courier_id),
            destination: self
                .destination
                .unwrap_or_else(|| current.destination.clone()),
            departs_at: self.departs_at.unwrap_or(current.departs_at),
            arrives_at: self.arrives_at.unwrap_or(current.arrives_at),
        }
    }
}

impl From<NewRoute> for RoutePatch {
    fn from(r: NewRoute) -> Self {
        Self {
            courier_id: Some(r.courier_id),
            destination: Some(r.destination),
            departs_at: Some(r.departs_at),
            arrives_at: Some(r.arrives_at),
        }
    }
}

impl InputShape for RouteDraft {
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::required("repartidor_id", FieldKind::Integer),
        FieldSpec::required("destino", FieldKind::Text),
        FieldSpec::required("hora_salida", FieldKind::Timestamp),
        FieldSpec::optional("hora_llegada", FieldKind::Timestamp),
    ];
}

impl InputShape for RoutePatch {
    const FIELDS: &'static [FieldSpec] = RouteDraft::FIELDS;
    const PARTIAL: bool = true;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn draft(departs: DateTime<Utc>, arrives: Option<DateTime<Utc>>) -> RouteDraft {
        RouteDraft {
            courier_id: 3,
            destination: "Universidad Central".into(),
            departs_at: departs,
            arrives_at: arrives,
        }
    }

    #[test]
    fn open_route_is_accepted() {
        assert!(draft(Utc::now(), None).validate().is_ok());
    }

    #[test]
    fn arrival_after_departure() {
        let t = Utc::now();
        assert!(draft(t, Some(t + Duration::minutes(45))).validate().is_ok());
    }

    #[test]
    fn arrival_not_after_departure_is_rejected() {
        let t = Utc::now();
        for arrives in [t, t - Duration::minutes(1)] {
            let errs = draft(t, Some(arrives)).validate().unwrap_err();
            assert!(errs.has_field("hora_llegada"));
        }
    }

    #[test]
    fn destination_required() {
        let errs = RouteDraft {
            destination: "".into(),
            ..draft(Utc::now(), None)
        }
        .validate()
        .unwrap_err();
        assert!(errs.has_field("destino"));
    }

    #[test]
    fn patch_moving_departure_revalidates_arrival() {
        let t = Utc::now();
        let current = Route {
            id: 1,
            courier_id: 3,
            destination: "Universidad Central".into(),
            departs_at: t,
            arrives_at: Some(t + Duration::minutes(45)),
        };

        let merged = RoutePatch {
            departs_at: Some(t + Duration::hours(1)),
            ..Default::default()
        }
        .apply(&current);
        assert!(merged.clone().validate().is_err());

        let cleared = RoutePatch {
            departs_at: Some(t + Duration::hours(1)),
            arrives_at: Some(None),
            ..Default::default()
        }
        .apply(&current);
        assert!(cleared.validate().is_ok());
    }

    #[test]
    fn arrival_wire_forms() {
        let open: RouteDraft = serde_json::from_str(
            r#"{"repartidor_id": 1, "destino": "Universidad Central",
                "hora_salida": "2024-06-01T10:00:00"}"#,
        )
        .unwrap();
        assert_eq!(open.arrives_at, None);

        let keep: RoutePatch = serde_json::from_str(r#"{"destino": "Centro"}"#).unwrap();
        assert_eq!(keep.arrives_at, None);

        let clear: RoutePatch = serde_json::from_str(r#"{"hora_llegada": null}"#).unwrap();
        assert_eq!(clear.arrives_at, Some(None));

        let set: RoutePatch =
            serde_json::from_str(r#"{"hora_llegada": "2024-06-01T11:15:00.5"}"#).unwrap();
        assert_eq!(
            set.arrives_at.flatten().map(|t| t.timestamp_subsec_millis()),
            Some(500)
        );
    }
}
