//! Table bootstrap
//!
//! Tables are created idempotently at startup; there is no migration
//! history. Numeric and status checks mirror the validation rules so that
//! rows written outside the API still hold them.

use sqlx::SqlitePool;

/// Create every table and index that does not exist yet.
pub async fn run(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    tracing::info!("Bootstrapping schema...");

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS inventory_products (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            quantity INTEGER NOT NULL CHECK (quantity >= 0),
            unit_price REAL NOT NULL CHECK (unit_price > 0),
            received_at TEXT NOT NULL,
            status TEXT NOT NULL CHECK (status IN ('Disponible', 'Vendido', 'Expirado'))
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS discount_offers (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            product_id INTEGER NOT NULL REFERENCES inventory_products(id) ON DELETE CASCADE,
            discount_price REAL NOT NULL CHECK (discount_price > 0),
            starts_at TEXT NOT NULL,
            ends_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS couriers (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            phone TEXT NOT NULL,
            zone TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS deliveries (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            courier_id INTEGER NOT NULL REFERENCES couriers(id) ON DELETE CASCADE,
            scheduled_at TEXT NOT NULL,
            description TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS delivery_routes (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            courier_id INTEGER NOT NULL REFERENCES couriers(id) ON DELETE CASCADE,
            destination TEXT NOT NULL,
            departs_at TEXT NOT NULL,
            arrives_at TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    create_indexes(pool).await?;

    tracing::info!("Schema ready");
    Ok(())
}

async fn create_indexes(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_discount_offers_product ON discount_offers(product_id)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_deliveries_courier ON deliveries(courier_id)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_delivery_routes_courier ON delivery_routes(courier_id)")
        .execute(pool)
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_memory_pool;

    #[tokio::test]
    async fn bootstrap_is_idempotent() {
        let pool = create_memory_pool().await.unwrap();
        run(&pool).await.unwrap();
        run(&pool).await.unwrap();

        let tables: Vec<(String,)> = sqlx::query_as(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
        )
        .fetch_all(&pool)
        .await
        .unwrap();

        let names: Vec<_> = tables.into_iter().map(|(n,)| n).collect();
        assert_eq!(
            names,
            vec![
                "couriers",
                "deliveries",
                "delivery_routes",
                "discount_offers",
                "inventory_products"
            ]
        );
    }

    #[tokio::test]
    async fn rejects_unknown_status_at_store_level() {
        let pool = create_memory_pool().await.unwrap();
        run(&pool).await.unwrap();

        let result = sqlx::query(
            "INSERT INTO inventory_products (name, quantity, unit_price, received_at, status) \
             VALUES ('x', 1, 1.0, '2024-01-01T00:00:00+00:00', 'Agotado')",
        )
        .execute(&pool)
        .await;

        assert!(result.is_err());
    }
}
