//! Command-line interface for station-seed
//!
//! # Usage Examples
//!
//! ```bash
//! # Seed with the built-in plan (DB_* variables from the environment or .env)
//! station-seed
//!
//! # Fewer employees and orders, deterministic values
//! station-seed --ec 20 --oc 50 --seed 42
//!
//! # Plan file, existing administrator, orders committed every 25 attempts
//! station-seed --plan plan.yaml --skip-admin-init --commit-every 25
//! ```

use anyhow::Context;
use clap::Parser;
use seed_populate_postgresql::{PostgreSQLConnectionArgs, SeedArgs};
use station_seed::{run_seed, SeedPlan};

#[derive(Parser)]
#[command(name = "station-seed")]
#[command(about = "Populate a vehicle service station database with fake data")]
#[command(long_about = None)]
struct Cli {
    /// Database connection options
    #[command(flatten)]
    connection: PostgreSQLConnectionArgs,

    /// Seeding options
    #[command(flatten)]
    seed: SeedArgs,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = run().await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // A missing .env is fine; variables may come from the environment
    if let Ok(path) = dotenvy::dotenv() {
        tracing::debug!("Loaded environment from {}", path.display());
    }

    let cli = Cli::parse();
    let plan = SeedPlan::resolve(&cli.seed).context("Invalid seed plan")?;

    let summary = run_seed(&cli.connection, &cli.seed, &plan).await?;

    tracing::info!(
        "Seeding finished: {} service centers, {} rows in the concurrent phase, {} orders ({} abandoned), {} receipts",
        summary.service_centers,
        summary
            .concurrent
            .completed
            .iter()
            .map(|(_, rows)| rows)
            .sum::<u64>(),
        summary.orders.orders_created,
        summary.orders.abandoned,
        summary.receipts
    );
    if !summary.concurrent.skipped.is_empty() {
        tracing::warn!(
            "Tasks skipped because the deadline passed: {}",
            summary.concurrent.skipped.join(", ")
        );
    }
    Ok(())
}
