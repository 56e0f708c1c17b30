//! CLI administration tool for fixmycar.
//!
//! Inspects the database without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Check database connection
//! cargo run --bin admin -- db check
//!
//! # Row counts per table
//! cargo run --bin admin -- stats
//!
//! # Preview what deleting customer 3 would remove
//! cargo run --bin admin -- cascade customer 3
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` (required): PostgreSQL connection string

use fixmycar::application::coordinator::ConsistencyCoordinator;
use fixmycar::domain::relationships::CascadeDeletion;
use fixmycar::infrastructure::cache::Caches;
use fixmycar::infrastructure::persistence::pg_entity_store;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for inspecting fixmycar data.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Show row counts
    Stats,
    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
    /// Preview the rows a delete would remove, without deleting anything
    Cascade {
        /// Kind of the entity to delete
        #[arg(value_enum)]
        kind: EntityKind,
        /// Id of the entity to delete
        id: i64,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,
    /// Show database info
    Info,
}

#[derive(Clone, Copy, ValueEnum)]
enum EntityKind {
    Customer,
    Car,
    ServiceCenter,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let pool = PgPool::connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    match cli.command {
        Commands::Stats => handle_stats(&pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
        Commands::Cascade { kind, id } => handle_cascade(kind, id, pool).await?,
    }

    Ok(())
}

/// Prints row counts of every table.
async fn handle_stats(pool: &PgPool) -> Result<()> {
    println!("{}", "Statistics".bright_blue().bold());
    println!();

    for (label, table) in [
        ("Customers", "customers"),
        ("Cars", "cars"),
        ("Service centers", "service_centers"),
        ("Service requests", "service_requests"),
    ] {
        let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
            .fetch_one(pool)
            .await
            .with_context(|| format!("Failed to count {}", table))?;

        println!(
            "  {:<18}{}",
            format!("{}:", label),
            count.to_string().bright_green().bold()
        );
    }
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            println!("  PostgreSQL: {}", version.bright_white());
            println!();
        }
    }

    Ok(())
}

/// Computes a deletion plan with caching disabled and prints it.
async fn handle_cascade(kind: EntityKind, id: i64, pool: PgPool) -> Result<()> {
    let store = pg_entity_store(Arc::new(pool));
    let coordinator = ConsistencyCoordinator::new(store, Arc::new(Caches::new(false)));

    let plan = match kind {
        EntityKind::Customer => coordinator.plan_customer_deletion(id).await,
        EntityKind::Car => coordinator.plan_car_deletion(id).await,
        EntityKind::ServiceCenter => coordinator.plan_service_center_deletion(id).await,
    }
    .map_err(|e| anyhow::anyhow!("{}", e))?;

    print_plan(&plan);
    Ok(())
}

fn print_plan(plan: &CascadeDeletion) {
    println!(
        "{} {} #{} would remove {} rows",
        "Delete".red().bold(),
        plan.root.kind(),
        plan.root.id(),
        plan.row_count().to_string().bright_white().bold()
    );
    println!();

    if !plan.cars.is_empty() {
        println!("  {}", "Cars".bright_blue());
        for car in &plan.cars {
            println!("    #{:<6} {} {} ({})", car.id, car.brand, car.model, car.vin);
        }
    }

    if !plan.requests.is_empty() {
        println!("  {}", "Service requests".bright_blue());
        for request in &plan.requests {
            println!(
                "    #{:<6} [{}] {}",
                request.id,
                request.status.yellow(),
                request.description
            );
        }
    }

    if plan.cars.is_empty() && plan.requests.is_empty() {
        println!("  {}", "No dependent rows".dimmed());
    }
    println!();
}
