//! ofertactl-core: domain model for the ofertactl logistics service
//!
//! Five record types (inventory products, discounted offers, couriers,
//! deliveries and delivery routes) together with the rules that decide
//! whether an input may be stored. Nothing in this crate performs I/O.

pub mod models;

pub use models::{
    Courier, CourierDraft, CourierPatch, Delivery, DeliveryDraft, DeliveryPatch, FieldKind,
    FieldSpec, InputShape, NewCourier, NewDelivery, NewOffer, NewProduct, NewRoute, Offer,
    OfferDraft, OfferPatch, Page, PageParams, Pagination, Product, ProductDraft, ProductPatch,
    ProductStatus, ProductWithOffers, Route, RouteDraft, RoutePatch, Validate, ValidationError,
    ValidationErrors,
};
