//! Shopgate Server
//!
//! A storefront gateway that fronts a hosted order and product platform and
//! accepts Razorpay payment webhooks.

mod api;
mod config;
mod server;
mod shutdown;
mod state;

use clap::Parser;
use config::file::StorageBackend;
use config::{ConfigLoader, get_database_url};
use server::{build_router, run_server};
use shopgate_core::processors::WebhookIntake;
use shopgate_core::services::UpstreamClient;
use shopgate_core::stores::{MemoryWebhookEventStore, PgWebhookEventStore, WebhookEventStore};
use shopgate_core::verification::RazorpayVerifier;
use shutdown::spawn_config_reload_handler;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use state::AppState;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Shopgate - storefront gateway for orders, products, and payment webhooks
#[derive(Parser, Debug)]
#[command(name = "shopgate-server")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, default_value = "./shopgate.toml")]
    config: PathBuf,

    /// Override the listen address (e.g., 0.0.0.0:3000)
    #[arg(short, long)]
    listen: Option<SocketAddr>,

    /// Run database migrations on startup
    #[arg(long, default_value = "false")]
    migrate: bool,

    /// Emit logs as JSON lines
    #[arg(long, env = "SHOPGATE_LOG_JSON", default_value = "false")]
    log_json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize tracing
    init_tracing(args.log_json);

    tracing::info!("Starting shopgate-server v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config_loader = Arc::new(ConfigLoader::new(&args.config, args.listen));
    let loaded_config = config_loader.load().map_err(|e| {
        tracing::error!(error = %e, "Failed to load configuration");
        e
    })?;

    let listen_addr = loaded_config.server.listen;
    let backend = loaded_config.storage;
    tracing::info!(path = ?args.config, ?backend, "Configuration loaded");

    // Convert to shared config with separate locks for each section
    let shared_config = loaded_config.into_shared();

    // Open the webhook event store
    let mut db_pool = None;
    let store: Arc<dyn WebhookEventStore> = match backend {
        StorageBackend::Postgres => {
            let pool = connect_database(args.migrate).await?;
            db_pool = Some(pool.clone());
            Arc::new(PgWebhookEventStore::new(pool))
        }
        StorageBackend::Memory => {
            if args.migrate {
                tracing::warn!("--migrate ignored for the memory storage backend");
            }
            tracing::warn!("Using in-memory webhook store; events are lost on restart");
            Arc::new(MemoryWebhookEventStore::new())
        }
    };

    // Create application state
    let verifier = Arc::new(RazorpayVerifier::new(shared_config.razorpay.clone()));
    let upstream = Arc::new(UpstreamClient::new(shared_config.upstream.clone()));
    let state = AppState {
        config: shared_config,
        orders: upstream.clone(),
        products: upstream.clone(),
        search: upstream,
        webhook_intake: WebhookIntake::new(store, verifier),
    };

    // Spawn config reload handler (listens for SIGHUP)
    let shutdown_notify = spawn_config_reload_handler(state.clone(), config_loader);

    // Build the router
    let router = build_router(state);

    // Run the server
    tracing::info!("Starting HTTP server on {}", listen_addr);
    let result = run_server(router, listen_addr).await;

    // Signal the config reload handler to stop
    shutdown_notify.notify_one();

    // Close database connections gracefully
    if let Some(pool) = db_pool {
        tracing::info!("Closing database connections...");
        pool.close().await;
    }
    tracing::info!("Server shutdown complete");

    result.map_err(Into::into)
}

/// Connect to `DATABASE_URL`, optionally running migrations.
async fn connect_database(migrate: bool) -> anyhow::Result<PgPool> {
    let database_url = get_database_url().map_err(|e| {
        tracing::error!("DATABASE_URL environment variable not set");
        e
    })?;

    tracing::info!("Connecting to database...");
    let db_pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&database_url)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to connect to database");
            e
        })?;
    tracing::info!("Database connection established");

    if migrate {
        tracing::info!("Running database migrations...");
        sqlx::migrate!("../migrations")
            .run(&db_pool)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to run migrations");
                e
            })?;
        tracing::info!("Migrations completed successfully");
    }

    Ok(db_pool)
}

/// Initialize the tracing subscriber with environment-based filtering.
fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn,tower_http=debug"));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
