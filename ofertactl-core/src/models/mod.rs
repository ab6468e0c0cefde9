//! Domain models with validation at construction
//!
//! Every entity comes in three input shapes:
//! - a draft (raw create/replace payload),
//! - a validated `New*` record, obtainable only through [`Validate`],
//! - a patch with optional fields, merged onto the stored record.
//!
//! Invalid input returns [`ValidationErrors`], not panic.

pub mod validation;
pub mod shape;
pub mod timestamp;
pub mod pagination;
pub mod product;
pub mod offer;
pub mod courier;
pub mod delivery;
pub mod route;

pub use validation::{FieldViolation, Validate, ValidationError, ValidationErrors};
pub use shape::{FieldKind, FieldSpec, InputShape};
pub use pagination::{Page, PageParams, Pagination};
pub use product::{NewProduct, Product, ProductDraft, ProductPatch, ProductStatus, ProductWithOffers};
pub use offer::{NewOffer, Offer, OfferDraft, OfferPatch};
pub use courier::{Courier, CourierDraft, CourierPatch, NewCourier};
pub use delivery::{Delivery, DeliveryDraft, DeliveryPatch, NewDelivery};
pub use route::{NewRoute, Route, RouteDraft, RoutePatch};
