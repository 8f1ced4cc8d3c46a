//! Runs the blog schema migrations (`up`, `down`, `fresh`, `status`, ...).

use sea_orm_migration::prelude::*;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    tracing::info!(
        migrations = migration::Migrator::migrations().len(),
        "Running blog schema migrations"
    );
    cli::run_cli(migration::Migrator).await;
}
