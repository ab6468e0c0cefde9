//! Sample data for local development
//!
//! Inserts a small, coherent data set: four products (one already sold),
//! three couriers, an offer for each available product, two scheduled
//! deliveries and three routes. Every record goes through the same
//! validation as API input.

use chrono::{DateTime, Duration, Utc};
use ofertactl_core::{
    CourierDraft, DeliveryDraft, OfferDraft, ProductDraft, ProductStatus, RouteDraft, Validate,
};
use serde::Serialize;
use sqlx::SqlitePool;

use super::{CourierRepo, DbError, DeliveryRepo, OfferRepo, ProductRepo, RouteRepo};

/// Row counts inserted by [`insert_sample_data`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeedSummary {
    pub products: usize,
    pub offers: usize,
    pub couriers: usize,
    pub deliveries: usize,
    pub routes: usize,
}

/// Insert the sample data set relative to the current time.
pub async fn insert_sample_data(pool: &SqlitePool) -> Result<SeedSummary, DbError> {
    insert_sample_data_at(pool, Utc::now()).await
}

/// Insert the sample data set relative to `now`.
pub async fn insert_sample_data_at(
    pool: &SqlitePool,
    now: DateTime<Utc>,
) -> Result<SeedSummary, DbError> {
    let mut summary = SeedSummary::default();

    let products = ProductRepo::new(pool);
    let product_rows = [
        ("Pan integral", 50, 2.50, now - Duration::days(1), ProductStatus::Available),
        ("Croissants", 20, 1.80, now - Duration::hours(12), ProductStatus::Available),
        ("Ensalada fresca", 15, 4.50, now - Duration::hours(6), ProductStatus::Available),
        ("Sándwich jamón", 0, 3.20, now - Duration::days(2), ProductStatus::Sold),
    ];
    let mut product_ids = Vec::with_capacity(product_rows.len());
    for (name, quantity, unit_price, received_at, status) in product_rows {
        let draft = ProductDraft {
            name: name.into(),
            quantity,
            unit_price,
            received_at,
            status: status.as_str().into(),
        };
        product_ids.push(products.create(draft.validate_at(now)?).await?.id);
    }
    summary.products = product_ids.len();

    let couriers = CourierRepo::new(pool);
    let courier_rows = [
        ("Carlos Mendoza", "0998765432", "Norte"),
        ("Ana García", "0987654321", "Sur"),
        ("Luis Rodríguez", "0976543210", "Centro"),
    ];
    let mut courier_ids = Vec::with_capacity(courier_rows.len());
    for (name, phone, zone) in courier_rows {
        let draft = CourierDraft {
            name: name.into(),
            phone: phone.into(),
            zone: Some(zone.into()),
        };
        courier_ids.push(couriers.create(draft.validate_at(now)?).await?.id);
    }
    summary.couriers = courier_ids.len();

    let offers = OfferRepo::new(pool);
    let offer_rows = [
        (product_ids[0], 1.50, Duration::hours(6)),
        (product_ids[1], 1.00, Duration::hours(4)),
        (product_ids[2], 2.50, Duration::hours(8)),
    ];
    for (product_id, discount_price, window) in offer_rows {
        let draft = OfferDraft {
            product_id,
            discount_price,
            starts_at: now,
            ends_at: now + window,
        };
        offers.create(draft.validate_at(now)?).await?;
        summary.offers += 1;
    }

    let deliveries = DeliveryRepo::new(pool);
    let delivery_rows = [
        (
            courier_ids[0],
            Duration::hours(2),
            "Entrega de pan integral - Cliente preferente",
        ),
        (courier_ids[1], Duration::hours(3), "Entrega múltiple - 3 productos"),
    ];
    for (courier_id, ahead, description) in delivery_rows {
        let draft = DeliveryDraft {
            courier_id,
            scheduled_at: now + ahead,
            description: Some(description.into()),
        };
        deliveries.create(draft.validate_at(now)?).await?;
        summary.deliveries += 1;
    }

    let routes = RouteRepo::new(pool);
    let route_rows = [
        (courier_ids[0], "Av. Amazonas y Naciones Unidas", Duration::hours(1), None),
        (courier_ids[1], "Centro Comercial El Jardín", Duration::hours(2), None),
        (
            courier_ids[2],
            "Universidad Central",
            Duration::minutes(30),
            Some(Duration::minutes(75)),
        ),
    ];
    for (courier_id, destination, departs, arrives) in route_rows {
        let draft = RouteDraft {
            courier_id,
            destination: destination.into(),
            departs_at: now + departs,
            arrives_at: arrives.map(|d| now + d),
        };
        routes.create(draft.validate_at(now)?).await?;
        summary.routes += 1;
    }

    tracing::info!(
        products = summary.products,
        offers = summary.offers,
        couriers = summary.couriers,
        deliveries = summary.deliveries,
        routes = summary.routes,
        "sample data inserted"
    );
    Ok(summary)
}
