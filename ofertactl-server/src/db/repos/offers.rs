//! Discount offer repository

use ofertactl_core::{NewOffer, Offer, OfferPatch, Page, Pagination, Validate};
use sqlx::SqlitePool;

use super::{begin_write, missing_parent, DbError};

const RESOURCE: &str = "offer";

/// Offer repository
pub struct OfferRepo<'a> {
    pool: &'a SqlitePool,
}

impl<'a> OfferRepo<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert an offer. Fails with `MissingParent` if the product is gone.
    pub async fn create(&self, offer: NewOffer) -> Result<Offer, DbError> {
        let created: Offer = sqlx::query_as(
            r#"
            INSERT INTO discount_offers (product_id, discount_price, starts_at, ends_at)
            VALUES (?, ?, ?, ?)
            RETURNING id, product_id, discount_price, starts_at, ends_at
            "#,
        )
        .bind(offer.product_id)
        .bind(offer.discount_price)
        .bind(offer.starts_at)
        .bind(offer.ends_at)
        .fetch_one(self.pool)
        .await
        .map_err(missing_parent(RESOURCE, "product"))?;

        tracing::debug!(id = created.id, product_id = created.product_id, "offer created");
        Ok(created)
    }

    pub async fn get(&self, id: i64) -> Result<Offer, DbError> {
        sqlx::query_as::<_, Offer>(
            r#"
            SELECT id, product_id, discount_price, starts_at, ends_at
            FROM discount_offers
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or_else(|| DbError::not_found(RESOURCE, id))
    }

    pub async fn list(&self, page: Pagination) -> Result<Page<Offer>, DbError> {
        let (total,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM discount_offers")
            .fetch_one(self.pool)
            .await?;

        let items: Vec<Offer> = sqlx::query_as(
            r#"
            SELECT id, product_id, discount_price, starts_at, ends_at
            FROM discount_offers
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

    /// All offers of one product, oldest first.
    pub async fn list_for_product(&self, product_id: i64) -> Result<Vec<Offer>, DbError> {
        let items: Vec<Offer> = sqlx::query_as(
            r#"
            SELECT id, product_id, discount_price, starts_at, ends_at
            FROM discount_offers
            WHERE product_id = ?
            ORDER BY id
            "#,
        )
        .bind(product_id)
        .fetch_all(self.pool)
        .await?;

        Ok(items)
    }

    /// Apply a patch; the merged window must still end after it starts.
    pub async fn update(&self, id: i64, patch: OfferPatch) -> Result<Offer, DbError> {
        let mut tx = begin_write(self.pool).await?;

        let current: Offer = sqlx::query_as(
            r#"
            SELECT id, product_id, discount_price, starts_at, ends_at
            FROM discount_offers
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| DbError::not_found(RESOURCE, id))?;

        let offer = patch.apply(&current).validate()?;

        let updated: Offer = sqlx::query_as(
            r#"
            UPDATE discount_offers
            SET product_id = ?, discount_price = ?, starts_at = ?, ends_at = ?
            WHERE id = ?
            RETURNING id, product_id, discount_price, starts_at, ends_at
            "#,
        )
        .bind(offer.product_id)
        .bind(offer.discount_price)
        .bind(offer.starts_at)
        .bind(offer.ends_at)
        .bind(id)
        .fetch_one(&mut *tx)
        .await
        .map_err(missing_parent(RESOURCE, "product"))?;

        tx.commit().await?;
        Ok(updated)
    }

    pub async fn delete(&self, id: i64) -> Result<(), DbError> {
        let result = sqlx::query("DELETE FROM discount_offers WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found(RESOURCE, id));
        }
        Ok(())
    }
}
