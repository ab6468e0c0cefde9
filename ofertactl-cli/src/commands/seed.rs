//! Sample data command

use anyhow::{Context, Result};
use clap::Args;

use ofertactl_server::db::insert_sample_data;

use super::DbArgs;

/// Arguments for the seed command
#[derive(Args, Debug)]
pub struct SeedArgs {
    #[command(flatten)]
    pub db: DbArgs,
}

/// Insert the sample data set and print what was written
pub async fn run_seed(args: SeedArgs) -> Result<()> {
    let pool = args.db.connect().await?;

    let summary = insert_sample_data(&pool)
        .await
        .context("Failed to insert sample data")?;
    pool.close().await;

    println!("Sample data inserted into {}", args.db.database_url);
    println!("  products:   {}", summary.products);
    println!("  offers:     {}", summary.offers);
    println!("  couriers:   {}", summary.couriers);
    println!("  deliveries: {}", summary.deliveries);
    println!("  routes:     {}", summary.routes);
    Ok(())
}
