use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use litscout_core::{
    load_config, validate_config, ConfigCredentials, CredentialProvider, OpportunityStore,
    SourceRegistry, SqliteStore,
};
use litscout_server::api::create_router;
use litscout_server::state::AppState;

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine config path
    let config_path = std::env::var("LITSCOUT_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    // Load configuration
    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    validate_config(&config).context("Configuration validation failed")?;

    let config_json = serde_json::to_string(&config).unwrap_or_default();
    let config_hash = format!("{:x}", Sha256::digest(config_json.as_bytes()));
    info!(
        version = VERSION,
        config_hash = &config_hash[..16],
        "Configuration loaded successfully"
    );
    info!(
        "Target region: {} ({}), source mode: {:?}",
        config.region.name, config.region.code, config.sources.mode
    );

    // Credentials: environment first, then [sources.credentials]
    let credentials: Arc<dyn CredentialProvider> =
        Arc::new(ConfigCredentials::new(&config.sources.credentials));

    let registry = SourceRegistry::from_config(
        &config.sources,
        &config.region,
        Arc::clone(&credentials),
    )
    .context("Failed to build source registry")?;
    info!("Source registry initialized with {} adapters", registry.len());

    // Persistence is optional; search keeps working without it
    let store: Option<Arc<dyn OpportunityStore>> = if config.database.enabled {
        match SqliteStore::new(&config.database.path) {
            Ok(store) => {
                info!("Store initialized at {:?}", config.database.path);
                Some(Arc::new(store))
            }
            Err(e) => {
                warn!(
                    "Failed to open store at {:?}, running without persistence: {}",
                    config.database.path, e
                );
                None
            }
        }
    } else {
        info!("Persistence disabled in config");
        None
    };

    let addr = SocketAddr::new(config.server.host, config.server.port);

    let state = Arc::new(AppState::new(
        config,
        Arc::new(registry),
        credentials,
        store,
    ));

    let app = create_router(state);

    // Start server
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shut down");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
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
                error!("Failed to install SIGTERM handler: {}", e);
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
}
