//! # Felis Server
//!
//! Cat breed catalog proxy with user login and registration.
//!
//! ## Architecture
//!
//! The server is built on Axum and uses:
//! - TheCatAPI (or any compatible upstream) for breed and image data
//! - PostgreSQL for user accounts, or process memory when no database is set

use std::{sync::Arc, time::Duration};

use anyhow::Context;
use clap::Parser;
use felis_core::{
    CatalogService, CredentialService,
    catalog::{CatApiClient, CatalogSource},
    credentials::{AccountStore, InMemoryAccountStore, PasswordCrypto, PostgresAccountStore},
};
use felis_server::{AppState, infra::config::Config, routes::create_app};
use sqlx::postgres::PgPoolOptions;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// CLI entry point
#[derive(Parser, Debug)]
#[command(name = "felis-server")]
#[command(about = "Cat breed catalog proxy with user login and registration")]
struct Cli {
    /// Address to bind (overrides SERVER_HOST)
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on (overrides SERVER_PORT)
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = Config::from_env().context("failed to load configuration")?;
    if let Some(host) = cli.host {
        config.server_host = host;
    }
    if let Some(port) = cli.port {
        config.server_port = port;
    }

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                // Override via RUST_LOG.
                "info,tower_http=warn".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if config.uses_default_pepper() {
        warn!("AUTH_PASSWORD_PEPPER is not set; using the built-in development pepper");
    }

    let client = CatApiClient::new(config.catalog()).context("invalid catalog configuration")?;
    info!(base_url = %client.base_url(), "catalog upstream configured");
    let source: Arc<dyn CatalogSource> = Arc::new(client);
    let catalog = CatalogService::new(source);

    let store = account_store(&config).await?;
    let crypto = Arc::new(
        PasswordCrypto::new(config.auth_password_pepper.as_bytes())
            .context("failed to initialise password hashing")?,
    );
    let credentials = CredentialService::new(store, crypto);

    let bind_addr = format!("{}:{}", config.server_host, config.server_port);

    let state = AppState::new(catalog, credentials, config);
    let router = create_app(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;
    info!("Starting Felis server on {}", listener.local_addr()?);
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Felis server stopped");
    Ok(())
}

async fn account_store(config: &Config) -> anyhow::Result<Arc<dyn AccountStore>> {
    let Some(url) = config.database_url.as_deref() else {
        warn!("DATABASE_URL is not set; accounts are kept in memory and lost on restart");
        return Ok(Arc::new(InMemoryAccountStore::new()));
    };

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(30))
        .connect(url)
        .await
        .context("Database connection failed")?;

    felis_core::MIGRATOR
        .run(&pool)
        .await
        .context("failed to run database migrations")?;
    info!("Database pool initialized and migrations applied");

    Ok(Arc::new(PostgresAccountStore::new(pool)))
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
