//! Backend entry-point: loads settings, migrates the database and serves the
//! REST API with its health probes and OpenAPI docs.

mod server;

use std::io;

use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use foodgram::inbound::http::health::HealthState;
use foodgram::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use foodgram::settings::AppSettings;
use server::{ServerConfig, create_server};

fn startup_error(context: &str, err: impl std::fmt::Display) -> io::Error {
    io::Error::other(format!("{context}: {err}"))
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load_from_iter(std::env::args_os())
        .map_err(|e| startup_error("failed to load settings", e))?;
    let bind_addr = settings
        .bind_addr()
        .map_err(|e| startup_error("invalid settings", e))?;
    let database_url = settings
        .database_url()
        .map_err(|e| startup_error("invalid settings", e))?;
    let pool_max_size = settings
        .pool_max_size()
        .map_err(|e| startup_error("invalid settings", e))?;
    let page_size = settings
        .page_size()
        .map_err(|e| startup_error("invalid settings", e))?;
    let recipes_limit = settings
        .recipes_limit()
        .map_err(|e| startup_error("invalid settings", e))?;

    if settings.run_migrations() {
        let applied = run_pending_migrations(database_url)
            .await
            .map_err(|e| startup_error("database migration failed", e))?;
        info!(applied, "database migrations complete");
    }

    let pool = DbPool::new(PoolConfig::new(database_url).with_max_size(pool_max_size))
        .await
        .map_err(|e| startup_error("failed to create database pool", e))?;

    let config = ServerConfig::new(bind_addr, pool)
        .with_page_size(page_size)
        .with_recipes_limit(recipes_limit);
    let server = create_server(HealthState::new(), config)?;
    info!(%bind_addr, "foodgram listening");
    server.await
}
