//! Inventory products
//!
//! A product is stock with a unit price and a lifecycle status. Discounted
//! offers reference it by id; the store owns both rows.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::offer::Offer;
use super::shape::{FieldKind, FieldSpec, InputShape};
use super::timestamp;
use super::validation::{Checks, Validate, ValidationError, ValidationErrors};

/// Maximum length for product names
pub const MAX_NAME_LEN: usize = 100;

/// Lifecycle status of a product
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProductStatus {
    #[serde(rename = "Disponible")]
    Available,
    #[serde(rename = "Vendido")]
    Sold,
    #[serde(rename = "Expirado")]
    Expired,
}

impl ProductStatus {
    pub const ALL: [ProductStatus; 3] = [Self::Available, Self::Sold, Self::Expired];

    /// Wire and storage representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "Disponible",
            Self::Sold => "Vendido",
            Self::Expired => "Expirado",
        }
    }
}

impl fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProductStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ValidationError::InvalidVariant {
                field: "estado",
                value: s.to_owned(),
            })
    }
}

impl TryFrom<String> for ProductStatus {
    type Error = ValidationError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// Stored product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    pub id: i64,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "cantidad")]
    pub quantity: i64,
    #[serde(rename = "precio_unitario")]
    pub unit_price: f64,
    #[serde(rename = "fecha_ingreso")]
    pub received_at: DateTime<Utc>,
    #[serde(rename = "estado")]
    #[cfg_attr(feature = "sqlx", sqlx(try_from = "String"))]
    pub status: ProductStatus,
}

/// Product with its offers inlined
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductWithOffers {
    #[serde(flatten)]
    pub product: Product,
    #[serde(rename = "ofertas")]
    pub offers: Vec<Offer>,
}

/// Create/replace payload for a product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDraft {
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "cantidad")]
    pub quantity: i64,
    #[serde(rename = "precio_unitario")]
    pub unit_price: f64,
    #[serde(rename = "fecha_ingreso", deserialize_with = "timestamp::deserialize")]
    pub received_at: DateTime<Utc>,
    #[serde(rename = "estado")]
    pub status: String,
}

/// Validated product, ready to be stored
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub struct NewProduct {
    pub name: String,
    pub quantity: i64,
    pub unit_price: f64,
    pub received_at: DateTime<Utc>,
    pub status: ProductStatus,
}

impl Validate for ProductDraft {
    type Output = NewProduct;

    fn validate_at(self, _now: DateTime<Utc>) -> Result<NewProduct, ValidationErrors> {
        let mut checks = Checks::default();

        let name = checks.text("nombre", &self.name, MAX_NAME_LEN);
        checks.non_negative("cantidad", self.quantity);
        checks.positive_amount("precio_unitario", self.unit_price);
        let status = self.status.parse::<ProductStatus>();
        if let Err(e) = &status {
            checks.push(e.clone());
        }
        checks.finish(())?;

        Ok(NewProduct {
            name,
            quantity: self.quantity,
            unit_price: self.unit_price,
            received_at: self.received_at,
            status: status?,
        })
    }
}

/// Partial update for a product
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductPatch {
    #[serde(rename = "nombre", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "cantidad", default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i64>,
    #[serde(rename = "precio_unitario", default, skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<f64>,
    #[serde(
        rename = "fecha_ingreso",
        default,
        deserialize_with = "timestamp::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub received_at: Option<DateTime<Utc>>,
    #[serde(rename = "estado", default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl ProductPatch {
    /// Overlay the present fields onto `current`.
    pub fn apply(self, current: &Product) -> ProductDraft {
        ProductDraft {
            name: self.name.unwrap_or_else(|| current.name.clone()),
            quantity: self.quantity.unwrap_or(current.quantity),
            unit_price: self.unit_price.unwrap_or(current.unit_price),
            received_at: self.received_at.unwrap_or(current.received_at),
            status: self
                .status
                .unwrap_or_else(|| current.status.as_str().to_owned()),
        }
    }
}

impl From<NewProduct> for ProductPatch {
    fn from(p: NewProduct) -> Self {
        Self {
            name: Some(p.name),
            quantity: Some(p.quantity),
            unit_price: Some(p.unit_price),
            received_at: Some(p.received_at),
            status: Some(p.status.as_str().to_owned()),
        }
    }
}

impl InputShape for ProductDraft {
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::required("nombre", FieldKind::Text),
        FieldSpec::required("cantidad", FieldKind::Integer),
        FieldSpec::required("precio_unitario", FieldKind::Number),
        FieldSpec::required("fecha_ingreso", FieldKind::Timestamp),
        FieldSpec::required("estado", FieldKind::Text),
    ];
}

impl InputShape for ProductPatch {
    const FIELDS: &'static [FieldSpec] = ProductDraft::FIELDS;
    const PARTIAL: bool = true;
}
