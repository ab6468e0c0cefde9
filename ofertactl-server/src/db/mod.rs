//! Database layer - connection pool, schema and repositories
//!
//! - One pool per process, built at startup and closed at shutdown
//! - Foreign keys are enforced on every connection; deleting a product or
//!   courier cascades to its offers, deliveries and routes
//! - Updates read, merge, validate and write inside one transaction

pub mod pool;
pub mod repos;
pub mod schema;
pub mod seed;

pub use pool::{create_memory_pool, create_pool, create_pool_with_options, ping};
pub use repos::*;
pub use seed::{insert_sample_data, insert_sample_data_at, SeedSummary};

/// Fresh in-memory database with the schema applied.
#[cfg(test)]
pub(crate) async fn test_pool() -> sqlx::SqlitePool {
    let pool = create_memory_pool().await.expect("memory pool");
    schema::run(&pool).await.expect("schema");
    pool
}
