//! ofertactl-server: HTTP API over the logistics store
//!
//! Serves inventory products, discounted offers, couriers, deliveries and
//! delivery routes from a SQLite database. Each request borrows one pooled
//! connection for its lifetime; nothing is cached between requests.

pub mod db;
pub mod http;

pub use db::{create_pool, DbError};
pub use http::{build_router, run_server, AppState, ServerConfig};
