//! Delivery repository

use ofertactl_core::{Delivery, DeliveryPatch, NewDelivery, Page, Pagination, Validate};
use sqlx::SqlitePool;

use super::{begin_write, missing_parent, DbError};

const RESOURCE: &str = "delivery";

/// Delivery repository
pub struct DeliveryRepo<'a> {
    pool: &'a SqlitePool,
}

impl<'a> DeliveryRepo<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, delivery: NewDelivery) -> Result<Delivery, DbError> {
        let created: Delivery = sqlx::query_as(
            r#"
            INSERT INTO deliveries (courier_id, scheduled_at, description)
            VALUES (?, ?, ?)
            RETURNING id, courier_id, scheduled_at, description
            "#,
        )
        .bind(delivery.courier_id)
        .bind(delivery.scheduled_at)
        .bind(&delivery.description)
        .fetch_one(self.pool)
        .await
        .map_err(missing_parent(RESOURCE, "courier"))?;

        tracing::debug!(id = created.id, courier_id = created.courier_id, "delivery created");
        Ok(created)
    }

    pub async fn get(&self, id: i64) -> Result<Delivery, DbError> {
        sqlx::query_as::<_, Delivery>(
            "SELECT id, courier_id, scheduled_at, description FROM deliveries WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or_else(|| DbError::not_found(RESOURCE, id))
    }

    pub async fn list(&self, page: Pagination) -> Result<Page<Delivery>, DbError> {
        let (total,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM deliveries")
            .fetch_one(self.pool)
            .await?;

        let items: Vec<Delivery> = sqlx::query_as(
            r#"
            SELECT id, courier_id, scheduled_at, description
            FROM deliveries
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

    /// Deliveries assigned to one courier, in insertion order.
    pub async fn list_for_courier(&self, courier_id: i64) -> Result<Vec<Delivery>, DbError> {
        let items: Vec<Delivery> = sqlx::query_as(
            r#"
            SELECT id, courier_id, scheduled_at, description
            FROM deliveries
            WHERE courier_id = ?
            ORDER BY id
            "#,
        )
        .bind(courier_id)
        .fetch_all(self.pool)
        .await?;

        Ok(items)
    }

    /// Apply a patch; the merged date is checked against the current clock.
    pub async fn update(&self, id: i64, patch: DeliveryPatch) -> Result<Delivery, DbError> {
        let mut tx = begin_write(self.pool).await?;

        let current: Delivery = sqlx::query_as(
            "SELECT id, courier_id, scheduled_at, description FROM deliveries WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| DbError::not_found(RESOURCE, id))?;

        let delivery = patch.apply(&current).validate()?;

        let updated: Delivery = sqlx::query_as(
            r#"
            UPDATE deliveries
            SET courier_id = ?, scheduled_at = ?, description = ?
            WHERE id = ?
            RETURNING id, courier_id, scheduled_at, description
            "#,
        )
        .bind(delivery.courier_id)
        .bind(delivery.scheduled_at)
        .bind(&delivery.description)
        .bind(id)
        .fetch_one(&mut *tx)
        .await
        .map_err(missing_parent(RESOURCE, "courier"))?;

        tx.commit().await?;
        Ok(updated)
    }

    pub async fn delete(&self, id: i64) -> Result<(), DbError> {
        let result = sqlx::query("DELETE FROM deliveries WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found(RESOURCE, id));
        }
        Ok(())
    }
}
