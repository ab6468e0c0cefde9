//! Inventory product repository
//!
//! Offers are read alongside their products with one extra query per call,
//! never one query per product.

use std::collections::HashMap;

use ofertactl_core::{
    NewProduct, Offer, Page, Pagination, Product, ProductPatch, ProductWithOffers, Validate,
};
use sqlx::SqlitePool;

use super::{begin_write, DbError, OfferRepo};

const RESOURCE: &str = "product";

/// Product repository
pub struct ProductRepo<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ProductRepo<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a product and return the stored row.
    pub async fn create(&self, product: NewProduct) -> Result<Product, DbError> {
        let created: Product = sqlx::query_as(
            r#"
            INSERT INTO inventory_products (name, quantity, unit_price, received_at, status)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id, name, quantity, unit_price, received_at, status
            "#,
        )
        .bind(&product.name)
        .bind(product.quantity)
        .bind(product.unit_price)
        .bind(product.received_at)
        .bind(product.status.as_str())
        .fetch_one(self.pool)
        .await?;

        tracing::debug!(id = created.id, "product created");
        Ok(created)
    }

    /// Get a single product by id.
    pub async fn get(&self, id: i64) -> Result<Product, DbError> {
        sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, quantity, unit_price, received_at, status
            FROM inventory_products
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or_else(|| DbError::not_found(RESOURCE, id))
    }

    /// List products in insertion order.
    pub async fn list(&self, page: Pagination) -> Result<Page<Product>, DbError> {
        let (total,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM inventory_products")
            .fetch_one(self.pool)
            .await?;

        let items: Vec<Product> = sqlx::query_as(
            r#"
            SELECT id, name, quantity, unit_price, received_at, status
            FROM inventory_products
            ORDER BY id
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(self.pool)
        .await?;

        Ok(Page::new(items, total, page))
    }

    /// Get a product together with all of its offers.
    pub async fn get_with_offers(&self, id: i64) -> Result<ProductWithOffers, DbError> {
        let product = self.get(id).await?;
        let offers = OfferRepo::new(self.pool).list_for_product(id).await?;
        Ok(ProductWithOffers { product, offers })
    }

    /// List products with their offers inlined.
    ///
    /// Offers for the whole page are fetched in a single query.
    pub async fn list_with_offers(
        &self,
        page: Pagination,
    ) -> Result<Page<ProductWithOffers>, DbError> {
        let products = self.list(page).await?;

        let offers: Vec<Offer> = sqlx::query_as(
            r#"
            SELECT id, product_id, discount_price, starts_at, ends_at
            FROM discount_offers
            WHERE product_id IN (
                SELECT id FROM inventory_products ORDER BY id LIMIT ? OFFSET ?
            )
            ORDER BY id
            "#,
        )
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(self.pool)
        .await?;

        let mut by_product: HashMap<i64, Vec<Offer>> = HashMap::new();
        for offer in offers {
            by_product.entry(offer.product_id).or_default().push(offer);
        }

        Ok(products.map(|product| {
            let offers = by_product.remove(&product.id).unwrap_or_default();
            ProductWithOffers { product, offers }
        }))
    }

    /// Apply a patch to an existing product.
    ///
    /// The merged record is validated before it is written; nothing is
    /// written when the id does not exist.
    pub async fn update(&self, id: i64, patch: ProductPatch) -> Result<Product, DbError> {
        let mut tx = begin_write(self.pool).await?;

        let current: Product = sqlx::query_as(
            r#"
            SELECT id, name, quantity, unit_price, received_at, status
            FROM inventory_products
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| DbError::not_found(RESOURCE, id))?;

        let product = patch.apply(&current).validate()?;

        let updated: Product = sqlx::query_as(
            r#"
            UPDATE inventory_products
            SET name = ?, quantity = ?, unit_price = ?, received_at = ?, status = ?
            WHERE id = ?
            RETURNING id, name, quantity, unit_price, received_at, status
            "#,
        )
        .bind(&product.name)
        .bind(product.quantity)
        .bind(product.unit_price)
        .bind(product.received_at)
        .bind(product.status.as_str())
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(updated)
    }

    /// Delete a product; its offers go with it.
    pub async fn delete(&self, id: i64) -> Result<(), DbError> {
        let result = sqlx::query("DELETE FROM inventory_products WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found(RESOURCE, id));
        }
        tracing::debug!(id, "product deleted");
        Ok(())
    }
}
