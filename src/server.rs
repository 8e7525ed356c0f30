//! HTTP server initialization and runtime setup.
//!
//! Handles store selection, cache setup, safety checker wiring and the Axum
//! server lifecycle.

use crate::application::services::{AuthService, LinkService};
use crate::config::Config;
use crate::domain::safety::UrlSafetyChecker;
use crate::infrastructure::cache::{CacheService, NullCache, RedisCache};
use crate::infrastructure::persistence::Repositories;
use crate::infrastructure::safety::{AllowAllChecker, SafeBrowsingChecker};
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - Store (PostgreSQL with migrations, or in-memory)
/// - Redis cache (or NullCache fallback)
/// - URL safety checker
/// - Axum HTTP server with graceful shutdown
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let repositories = connect_store(&config).await?;
    let cache = connect_cache(&config).await;
    let safety = safety_checker(&config)?;

    let link_service = Arc::new(LinkService::new(
        repositories.quotas.clone(),
        repositories.links.clone(),
        repositories.analytics.clone(),
        safety,
        cache.clone(),
        config.limits.clone(),
    ));

    let state = AppState {
        link_service,
        auth_service: Arc::new(AuthService::new(&config.jwt_secret)),
        cache,
        links: repositories.links,
        limits: config.limits.clone(),
    };

    let app = app_router(state);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Opens a PostgreSQL pool using the configured pool settings.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect_pool(config: &Config, database_url: &str) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime))
        .connect(database_url)
        .await
        .context("Failed to connect to database")?;

    Ok(pool)
}

/// Selects the store backend: PostgreSQL when configured, otherwise in-memory.
///
/// # Errors
///
/// Returns an error if the database is unreachable or migrations fail.
pub async fn connect_store(config: &Config) -> Result<Repositories> {
    let Some(ref database_url) = config.database_url else {
        tracing::warn!("No database configured, using in-memory store (data is not persisted)");
        return Ok(Repositories::in_memory());
    };

    let pool = connect_pool(config, database_url).await?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Migrations applied");

    Ok(Repositories::postgres(Arc::new(pool)))
}

async fn connect_cache(config: &Config) -> Arc<dyn CacheService> {
    let Some(ref redis_url) = config.redis_url else {
        tracing::info!("Cache disabled (NullCache)");
        return Arc::new(NullCache::new());
    };

    match RedisCache::connect(redis_url, config.cache_ttl_seconds).await {
        Ok(redis) => {
            tracing::info!("Cache enabled (Redis)");
            Arc::new(redis)
        }
        Err(e) => {
            tracing::warn!("Failed to connect to Redis: {}. Using NullCache.", e);
            Arc::new(NullCache::new())
        }
    }
}

fn safety_checker(config: &Config) -> Result<Arc<dyn UrlSafetyChecker>> {
    match config.safe_browsing_api_key {
        Some(ref api_key) => {
            let checker = SafeBrowsingChecker::new(
                &config.safe_browsing_endpoint,
                api_key.clone(),
                Duration::from_millis(config.safe_browsing_timeout_ms),
            )
            .context("Failed to build Safe Browsing client")?;
            tracing::info!("URL safety checks enabled (Safe Browsing)");
            Ok(Arc::new(checker))
        }
        None => {
            tracing::warn!("SAFE_BROWSING_API_KEY not set, URL safety checks disabled");
            Ok(Arc::new(AllowAllChecker))
        }
    }
}

/// Resolves on SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, draining connections");
}
