//! Courier repository

use ofertactl_core::{Courier, CourierPatch, NewCourier, Page, Pagination, Validate};
use sqlx::SqlitePool;

use super::{begin_write, DbError};

const RESOURCE: &str = "courier";

/// Courier repository
pub struct CourierRepo<'a> {
    pool: &'a SqlitePool,
}

impl<'a> CourierRepo<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, courier: NewCourier) -> Result<Courier, DbError> {
        let created: Courier = sqlx::query_as(
            r#"
            INSERT INTO couriers (name, phone, zone)
            VALUES (?, ?, ?)
            RETURNING id, name, phone, zone
            "#,
        )
        .bind(&courier.name)
        .bind(&courier.phone)
        .bind(&courier.zone)
        .fetch_one(self.pool)
        .await?;

        tracing::debug!(id = created.id, "courier created");
        Ok(created)
    }

    pub async fn get(&self, id: i64) -> Result<Courier, DbError> {
        sqlx::query_as::<_, Courier>("SELECT id, name, phone, zone FROM couriers WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .ok_or_else(|| DbError::not_found(RESOURCE, id))
    }

    /// Fail with `NotFound` unless the courier exists.
    pub async fn ensure_exists(&self, id: i64) -> Result<(), DbError> {
        let found: Option<(i64,)> = sqlx::query_as("SELECT id FROM couriers WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        found
            .map(|_| ())
            .ok_or_else(|| DbError::not_found(RESOURCE, id))
    }

    pub async fn list(&self, page: Pagination) -> Result<Page<Courier>, DbError> {
        let (total,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM couriers")
            .fetch_one(self.pool)
            .await?;

        let items: Vec<Courier> = sqlx::query_as(
            r#"
            SELECT id, name, phone, zone
            FROM couriers
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

    pub async fn update(&self, id: i64, patch: CourierPatch) -> Result<Courier, DbError> {
        let mut tx = begin_write(self.pool).await?;

        let current: Courier =
            sqlx::query_as("SELECT id, name, phone, zone FROM couriers WHERE id = ?")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or_else(|| DbError::not_found(RESOURCE, id))?;

        let courier = patch.apply(&current).validate()?;

        let updated: Courier = sqlx::query_as(
            r#"
            UPDATE couriers
            SET name = ?, phone = ?, zone = ?
            WHERE id = ?
            RETURNING id, name, phone, zone
            "#,
        )
        .bind(&courier.name)
        .bind(&courier.phone)
        .bind(&courier.zone)
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(updated)
    }

    /// Delete a courier; deliveries and routes go with it.
    pub async fn delete(&self, id: i64) -> Result<(), DbError> {
        let result = sqlx::query("DELETE FROM couriers WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found(RESOURCE, id));
        }
        tracing::debug!(id, "courier deleted");
        Ok(())
    }
}
