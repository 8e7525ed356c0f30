//! CLI administration tool for quota-shortener.
//!
//! Provides commands for registering users, inspecting their short codes,
//! purging expired entries and checking the database without going through
//! the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Register a confirmed account so its requests are accepted
//! cargo run --bin admin -- user create 6f1c2a9e-0d1b-4a6e-9d43-2f0c5b7e8a10
//!
//! # Show a user's request counter
//! cargo run --bin admin -- user show 6f1c2a9e-0d1b-4a6e-9d43-2f0c5b7e8a10
//!
//! # List a user's short codes
//! cargo run --bin admin -- links list 6f1c2a9e-0d1b-4a6e-9d43-2f0c5b7e8a10
//!
//! # Delete short codes past their expiry
//! cargo run --bin admin -- links purge-expired
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` (or `DB_USER`/`DB_PASSWORD`/`DB_NAME`): PostgreSQL connection
//! - Limit variables (`MAX_LINKS_PER_USER`, ...) as for the server

use quota_shortener::application::services::{LinkService, UserService};
use quota_shortener::config::{Limits, database_url_from_env};
use quota_shortener::domain::Principal;
use quota_shortener::infrastructure::cache::NullCache;
use quota_shortener::infrastructure::persistence::Repositories;
use quota_shortener::infrastructure::safety::AllowAllChecker;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing quota-shortener.
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
    /// Manage user quota records
    User {
        #[command(subcommand)]
        action: UserAction,
    },

    /// Inspect and maintain short codes
    Links {
        #[command(subcommand)]
        action: LinksAction,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// Register a confirmed account
    Create {
        /// Identity-provider subject of the user
        user_uuid: String,
    },

    /// Show a user's request counter
    Show { user_uuid: String },
}

#[derive(Subcommand)]
enum LinksAction {
    /// List a user's short codes, newest first
    List { user_uuid: String },

    /// Delete every short code past its expiry, with its analytics
    PurgeExpired {
        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show row counts per table
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let database_url = database_url_from_env()?
        .context("DATABASE_URL (or DB_USER/DB_PASSWORD/DB_NAME) must be set")?;

    let pool = PgPool::connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    let repositories = Repositories::postgres(Arc::new(pool.clone()));

    match cli.command {
        Commands::User { action } => handle_user_action(action, &repositories).await?,
        Commands::Links { action } => handle_links_action(action, &repositories).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

async fn handle_user_action(action: UserAction, repositories: &Repositories) -> Result<()> {
    let users = UserService::new(repositories.quotas.clone());

    match action {
        UserAction::Create { user_uuid } => {
            println!("{}", "👤 Register User".bright_blue().bold());
            println!();

            let quota = users
                .register(&user_uuid)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to register user: {}", e))?;

            println!("  User: {}", quota.user_uuid.cyan());
            println!();
            println!("{}", "✅ User registered".green().bold());
        }
        UserAction::Show { user_uuid } => {
            let quota = users
                .get(&user_uuid)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to load user: {}", e))?;

            let last_request = quota
                .time_of_last_request
                .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
                .unwrap_or_else(|| "never".to_string());

            println!("{}", "👤 User Quota".bright_blue().bold());
            println!();
            println!("  User:              {}", quota.user_uuid.cyan());
            println!(
                "  Requests (window): {}",
                quota.requests_in_window.to_string().bright_green().bold()
            );
            println!("  Last request:      {}", last_request.bright_black());
            println!();
        }
    }

    Ok(())
}

async fn handle_links_action(action: LinksAction, repositories: &Repositories) -> Result<()> {
    let limits = Limits::from_env();
    limits.validate()?;

    let service = LinkService::new(
        repositories.quotas.clone(),
        repositories.links.clone(),
        repositories.analytics.clone(),
        Arc::new(AllowAllChecker),
        Arc::new(NullCache::new()),
        limits,
    );

    match action {
        LinksAction::List { user_uuid } => list_links(&service, &user_uuid).await?,
        LinksAction::PurgeExpired { yes } => purge_expired(&service, yes).await?,
    }

    Ok(())
}

/// Lists a user's short codes.
///
/// # Output Format
///
/// ```text
/// 🔗 Short codes of 6f1c2a9e-...
///
///   Code     Created              Expires              URL
///   ──────────────────────────────────────────────────────────────────
///   a1b2c3   2026-01-15 10:30     2027-01-15 10:30     https://example.com
/// ```
async fn list_links(service: &LinkService, user_uuid: &str) -> Result<()> {
    println!(
        "{} {}",
        "🔗 Short codes of".bright_blue().bold(),
        user_uuid.cyan()
    );
    println!();

    let links = service
        .list_links(&Principal::new(user_uuid))
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list short codes: {}", e))?;

    if links.is_empty() {
        println!("{}", "  No short codes found".yellow());
        return Ok(());
    }

    println!(
        "  {:<8} {:<20} {:<20} {}",
        "Code".bright_white().bold(),
        "Created".bright_white().bold(),
        "Expires".bright_white().bold(),
        "URL".bright_white().bold()
    );
    println!("  {}", "─".repeat(75).bright_black());

    for link in &links {
        println!(
            "  {:<8} {:<20} {:<20} {}",
            link.short_code.cyan(),
            link.created_at
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black(),
            link.expires_at
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black(),
            link.full_url
        );
    }

    println!();
    println!("  Total: {}", links.len().to_string().bright_white().bold());
    println!();

    Ok(())
}

/// Deletes expired short codes after confirmation (default: No).
async fn purge_expired(service: &LinkService, skip_confirm: bool) -> Result<()> {
    println!("{}", "🧹 Purge Expired Short Codes".bright_blue().bold());
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Delete every short code past its expiry?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let removed = service
        .purge_expired(Utc::now())
        .await
        .map_err(|e| anyhow::anyhow!("Failed to purge: {}", e))?;

    println!(
        "{} {}",
        "✅ Removed".green().bold(),
        removed.to_string().bright_white().bold()
    );
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "✅ Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "ℹ️  Database Information".bright_blue().bold());
            println!();

            let users: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM user_quotas")
                .fetch_one(pool)
                .await?;
            let links: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM short_codes")
                .fetch_one(pool)
                .await?;
            let clicks: i64 =
                sqlx::query_scalar("SELECT COALESCE(SUM(total_clicks), 0)::BIGINT FROM analytics")
                    .fetch_one(pool)
                    .await?;

            println!("  Users:       {}", users.to_string().bright_green().bold());
            println!("  Short codes: {}", links.to_string().bright_green().bold());
            println!("  Clicks:      {}", clicks.to_string().bright_green().bold());
            println!();
        }
    }

    Ok(())
}
