//! ofertactl - logistics API for discounted inventory
//!
//! Entry point for the `ofertactl` binary:
//! - `serve` runs the HTTP API
//! - `init-db` creates the tables
//! - `seed` loads a sample data set for local development

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod tracing_setup;

use commands::{DbArgs, SeedArgs, ServeArgs};
use tracing_setup::TracingConfig;

#[derive(Parser, Debug)]
#[command(
    name = "ofertactl",
    author,
    version,
    about = "Inventory, discounted offers, couriers and delivery routes over a REST API"
)]
struct Cli {
    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API server
    Serve(ServeArgs),

    /// Create the database tables if they do not exist
    InitDb(DbArgs),

    /// Insert sample products, offers, couriers, deliveries and routes
    Seed(SeedArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env is optional; real environment variables win
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    tracing_setup::init_tracing(&TracingConfig { debug: cli.debug })?;

    match cli.command {
        Commands::Serve(args) => commands::run_serve(args).await?,
        Commands::InitDb(args) => commands::run_init_db(args).await?,
        Commands::Seed(args) => commands::run_seed(args).await?,
    }
    Ok(())
}
