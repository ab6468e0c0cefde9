//! Command implementations for the ofertactl CLI

pub mod db;
pub mod seed;
pub mod serve;

pub use db::{run_init_db, DbArgs};
pub use seed::{run_seed, SeedArgs};
pub use serve::{run_serve, ServeArgs};
