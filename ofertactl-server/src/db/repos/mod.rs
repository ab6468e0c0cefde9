//! Repository implementations for database access
//!
//! Each repository borrows the pool and follows these patterns:
//! - `create` inserts and returns the stored row (RETURNING)
//! - `get`, `update` and `delete` report a missing id as `DbError::NotFound`
//! - `update` merges a patch and re-validates inside one write transaction
//! - lists are ordered by id, i.e. insertion order

pub mod products;
pub mod offers;
pub mod couriers;
pub mod deliveries;
pub mod routes;

use ofertactl_core::ValidationErrors;
use sqlx::{Sqlite, SqlitePool, Transaction};

pub use products::ProductRepo;
pub use offers::OfferRepo;
pub use couriers::CourierRepo;
pub use deliveries::DeliveryRepo;
pub use routes::RouteRepo;

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("not found: {resource} {id}")]
    NotFound { resource: &'static str, id: i64 },

    /// Foreign key points at a row that does not exist
    #[error("{resource} references a {parent} that does not exist")]
    MissingParent {
        resource: &'static str,
        parent: &'static str,
    },

    /// Merged patch broke a field or record rule
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
}

impl DbError {
    pub fn not_found(resource: &'static str, id: i64) -> Self {
        Self::NotFound { resource, id }
    }
}

/// Map a foreign key violation on a write to `DbError::MissingParent`.
pub(crate) fn missing_parent(
    resource: &'static str,
    parent: &'static str,
) -> impl FnOnce(sqlx::Error) -> DbError {
    move |e| match &e {
        sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
            DbError::MissingParent { resource, parent }
        }
        _ => DbError::Sqlx(e),
    }
}

/// Open a transaction that holds the write lock from its first statement.
///
/// A deferred transaction that reads before writing fails with SQLITE_BUSY
/// when another connection commits in between; `BEGIN IMMEDIATE` waits on
/// the busy timeout instead.
pub(crate) async fn begin_write(
    pool: &SqlitePool,
) -> Result<Transaction<'static, Sqlite>, sqlx::Error> {
    pool.begin_with("BEGIN IMMEDIATE").await
}
