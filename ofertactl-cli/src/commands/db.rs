//! Database connection arguments and the `init-db` command

use anyhow::{Context, Result};
use clap::Args;
use sqlx::SqlitePool;

use ofertactl_server::db::{create_pool_with_options, schema};

/// Where the store lives
#[derive(Args, Debug, Clone)]
pub struct DbArgs {
    /// SQLite database URL (created if missing)
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite://ofertas.db")]
    pub database_url: String,

    /// Maximum pooled connections
    #[arg(long, default_value_t = 5)]
    pub max_connections: u32,
}

impl DbArgs {
    /// Open the pool and make sure every table exists.
    pub async fn connect(&self) -> Result<SqlitePool> {
        let pool = create_pool_with_options(&self.database_url, self.max_connections)
            .await
            .with_context(|| format!("Failed to open database {}", self.database_url))?;

        schema::run(&pool)
            .await
            .context("Failed to create database tables")?;
        Ok(pool)
    }
}

/// Create the tables and exit
pub async fn run_init_db(args: DbArgs) -> Result<()> {
    let pool = args.connect().await?;
    pool.close().await;

    println!("Database ready: {}", args.database_url);
    Ok(())
}
