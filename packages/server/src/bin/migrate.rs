//! CLI for applying and inspecting schema migrations

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use portal_core::Config;
use sqlx::migrate::Migrator;
use sqlx::PgPool;

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

#[derive(Parser)]
#[command(name = "migrate")]
#[command(about = "Schema migration runner for the theme portal database")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply all pending migrations
    Run,

    /// Show applied and pending migrations
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run => cmd_run().await,
        Commands::Status => cmd_status().await,
    }
}

async fn get_pool() -> Result<PgPool> {
    let config = Config::from_env()?;
    PgPool::connect(&config.database_url)
        .await
        .context("Failed to connect to database")
}

async fn cmd_run() -> Result<()> {
    let pool = get_pool().await?;

    MIGRATOR
        .run(&pool)
        .await
        .context("Failed to run migrations")?;

    println!("Migrations applied");
    Ok(())
}

async fn cmd_status() -> Result<()> {
    let pool = get_pool().await?;

    // A fresh database has no bookkeeping table yet; treat that as nothing
    // applied rather than an error.
    let applied: Vec<i64> =
        sqlx::query_scalar("SELECT version FROM _sqlx_migrations ORDER BY version")
            .fetch_all(&pool)
            .await
            .unwrap_or_default();

    for migration in MIGRATOR.iter() {
        let state = if applied.contains(&migration.version) {
            "applied"
        } else {
            "pending"
        };
        println!(
            "{:<16} {:<8} {}",
            migration.version, state, migration.description
        );
    }

    Ok(())
}
