//! CLI administration tool for shortcode-service.
//!
//! Manages mappings and inspects the database directly, without going
//! through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Issue a short code
//! cargo run --bin admin -- create https://example.com/some/page
//!
//! # Show access statistics for a code
//! cargo run --bin admin -- stats abc123
//!
//! # Delete a mapping (asks for confirmation unless -y is given)
//! cargo run --bin admin -- delete abc123
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! Reads the same `DATABASE_URL` / `DB_*`, `BASE_URL` and `CODE_*` variables
//! as the server.

use shortcode_service::application::services::{DynMappingService, MappingService};
use shortcode_service::config::{self, Config};
use shortcode_service::domain::entities::Mapping;
use shortcode_service::domain::repositories::MappingRepository;
use shortcode_service::infrastructure::persistence::PgMappingRepository;
use shortcode_service::server::connect_pool;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing shortcode-service.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level commands.
#[derive(Subcommand)]
enum Commands {
    /// Issue a short code for a URL
    Create {
        /// Destination URL (scheme defaults to https)
        url: String,
    },

    /// Show a mapping with its access count
    Stats {
        /// Short code
        code: String,
    },

    /// Delete a mapping
    Delete {
        /// Short code
        code: String,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
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

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = config::load_from_env()?;
    let database_url = config
        .database_url
        .clone()
        .context("DATABASE_URL or DB_* variables must be set")?;

    let pool = connect_pool(&config, &database_url).await?;

    let repository: Arc<dyn MappingRepository> =
        Arc::new(PgMappingRepository::new(Arc::new(pool.clone())));
    let service: DynMappingService =
        MappingService::with_options(repository, config.service_options());

    match cli.command {
        Commands::Create { url } => create_mapping(&service, &config, &url).await?,
        Commands::Stats { code } => show_stats(&service, &config, &code).await?,
        Commands::Delete { code, yes } => delete_mapping(&service, &code, yes).await?,
        Commands::Db { action } => handle_db_action(action, &service, &pool).await?,
    }

    Ok(())
}

/// Issues a new code and prints how to reach it.
async fn create_mapping(service: &DynMappingService, config: &Config, url: &str) -> Result<()> {
    println!("{}", "🔗 Create Short Code".bright_blue().bold());
    println!();

    let mapping = service
        .create(url)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create mapping: {}", e))?;

    print_mapping(&mapping, config, false);

    println!("{}", "✅ Mapping created successfully!".green().bold());
    println!();

    Ok(())
}

/// Prints a mapping including its access count. Does not count as an access.
async fn show_stats(service: &DynMappingService, config: &Config, code: &str) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let mapping = service
        .stats(code)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to load stats: {}", e))?;

    print_mapping(&mapping, config, true);

    Ok(())
}

/// Deletes a mapping after confirmation (default: No).
async fn delete_mapping(service: &DynMappingService, code: &str, skip_confirm: bool) -> Result<()> {
    println!("{}", "🗑️  Delete Mapping".bright_blue().bold());
    println!();

    let mapping = service
        .retrieve(code)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to load mapping: {}", e))?;

    println!("  Code:        {}", mapping.code.cyan());
    println!("  Destination: {}", mapping.destination.bright_white());
    println!(
        "  Accesses:    {}",
        mapping.access_count.to_string().bright_black()
    );
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Delete this mapping? The code may be issued again later.")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    service
        .delete(code)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to delete mapping: {}", e))?;

    println!();
    println!("{}", "✅ Mapping deleted".green().bold());
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, service: &DynMappingService, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            service
                .health()
                .await
                .map_err(|e| anyhow::anyhow!("Database check failed: {}", e))?;

            println!("{}", "✅ Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "ℹ️  Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            let mappings = service
                .count()
                .await
                .map_err(|e| anyhow::anyhow!("Failed to count mappings: {}", e))?;

            println!("  PostgreSQL: {}", version.bright_white());
            println!(
                "  Mappings:   {}",
                mappings.to_string().bright_green().bold()
            );
            println!();
        }
    }

    Ok(())
}

fn print_mapping(mapping: &Mapping, config: &Config, with_count: bool) {
    println!("  Code:        {}", mapping.code.bright_yellow().bold());
    println!("  Destination: {}", mapping.destination.cyan());

    if let Some(base_url) = &config.base_url {
        println!(
            "  Short URL:   {}/{}",
            base_url.trim_end_matches('/').bright_white(),
            mapping.code.bright_white()
        );
    }

    if with_count {
        println!(
            "  Accesses:    {}",
            mapping.access_count.to_string().bright_green().bold()
        );
    }

    println!(
        "  Created:     {}",
        mapping
            .created_at
            .format("%Y-%m-%d %H:%M")
            .to_string()
            .bright_black()
    );
    println!(
        "  Updated:     {}",
        mapping
            .updated_at
            .format("%Y-%m-%d %H:%M")
            .to_string()
            .bright_black()
    );
    println!();
}
