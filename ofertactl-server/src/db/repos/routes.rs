//! Delivery route repository

use ofertactl_core::{NewRoute, Page, Pagination, Route, RoutePatch, Validate};
use sqlx::SqlitePool;

use super::{begin_write, missing_parent, DbError};

const RESOURCE: &str = "route";

/// Route repository
pub struct RouteRepo<'a> {
    pool: &'a SqlitePool,
}

impl<'a> RouteRepo<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, route: NewRoute) -> Result<Route, DbError> {
        let created: Route = sqlx::query_as(
            r#"
            INSERT INTO delivery_routes (courier_id, destination, departs_at, arrives_at)
            VALUES (?, ?, ?, ?)
            RETURNING id, courier_id, destination, departs_at, arrives_at
            "#,
        )
        .bind(route.courier_id)
        .bind(&route.destination)
        .bind(route.departs_at)
        .bind(route.arrives_at)
        .fetch_one(self.pool)
        .await
        .map_err(missing_parent(RESOURCE, "courier"))?;

        tracing::debug!(id = created.id, courier_id = created.courier_id, "route created");
        Ok(created)
    }

    pub async fn get(&self, id: i64) -> Result<Route, DbError> {
        sqlx::query_as::<_, Route>(
            r#"
            SELECT id, courier_id, destination, departs_at, arrives_at
            FROM delivery_routes
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or_else(|| DbError::not_found(RESOURCE, id))
    }

    pub async fn list(&self, page: Pagination) -> Result<Page<Route>, DbError> {
        let (total,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM delivery_routes")
            .fetch_one(self.pool)
            .await?;

        let items: Vec<Route> = sqlx::query_as(
            r#"
            SELECT id, courier_id, destination, departs_at, arrives_at
            FROM delivery_routes
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

    /// Routes driven by one courier, in insertion order.
    pub async fn list_for_courier(&self, courier_id: i64) -> Result<Vec<Route>, DbError> {
        let items: Vec<Route> = sqlx::query_as(
            r#"
            SELECT id, courier_id, destination, departs_at, arrives_at
            FROM delivery_routes
            WHERE courier_id = ?
            ORDER BY id
            "#,
        )
        .bind(courier_id)
        .fetch_all(self.pool)
        .await?;

        Ok(items)
    }

    pub async fn update(&self, id: i64, patch: RoutePatch) -> Result<Route, DbError> {
        let mut tx = begin_write(self.pool).await?;

        let current: Route = sqlx::query_as(
            r#"
            SELECT id, courier_id, destination, departs_at, arrives_at
            FROM delivery_routes
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| DbError::not_found(RESOURCE, id))?;

        let route = patch.apply(&current).validate()?;

        let updated: Route = sqlx::query_as(
            r#"
            UPDATE delivery_routes
            SET courier_id = ?, destination = ?, departs_at = ?, arrives_at = ?
            WHERE id = ?
            RETURNING id, courier_id, destination, departs_at, arrives_at
            "#,
        )
        .bind(route.courier_id)
        .bind(&route.destination)
        .bind(route.departs_at)
        .bind(route.arrives_at)
        .bind(id)
        .fetch_one(&mut *tx)
        .await
        .map_err(missing_parent(RESOURCE, "courier"))?;

        tx.commit().await?;
        Ok(updated)
    }

    pub async fn delete(&self, id: i64) -> Result<(), DbError> {
        let result = sqlx::query("DELETE FROM delivery_routes WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found(RESOURCE, id));
        }
        Ok(())
    }
}
