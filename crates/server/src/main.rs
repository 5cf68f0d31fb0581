mod api;
mod metrics;
mod state;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use spoor_core::{
    load_config, validate_config, FeatureFlags, FixedFlags, FlagsBackend, FlagsmithFlags,
    GeminiAnalyzer, HistoryStore, HttpClient, ReqwestHttpClient, RestWikiService, ScanBroadcaster,
    ScanOrchestrator, ScatAnalyzer, SqliteHistoryStore, WikiService,
};

use api::create_router;
use state::AppState;

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Buffer size for the scan event channel
const EVENT_BUFFER_SIZE: usize = 256;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {}", e);
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

    info!("spoor {}", VERSION);

    // Determine config path
    let config_path = std::env::var("SPOOR_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    // Load configuration
    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    // Validate configuration
    validate_config(&config).context("Configuration validation failed")?;

    // Log a config fingerprint so deployed instances can be told apart
    // without leaking secrets.
    let config_json = serde_json::to_string(&config).unwrap_or_default();
    let config_hash = format!("{:x}", Sha256::digest(config_json.as_bytes()));
    info!("Configuration loaded (hash {})", &config_hash[..16]);
    info!("Database path: {:?}", config.database.path);
    info!("Analysis model: {}", config.analysis.model);

    // Shared transport for descriptor-driven calls
    let http_client: Arc<dyn HttpClient> = Arc::new(ReqwestHttpClient::new(Duration::from_secs(
        config.http.timeout_secs as u64,
    )));

    // History store
    let history: Arc<dyn HistoryStore> = Arc::new(
        SqliteHistoryStore::new(&config.database.path).context("Failed to open history store")?,
    );
    info!("History store initialized");

    // Analysis service
    let mut analyzer = GeminiAnalyzer::new(&config.analysis.api_key, &config.analysis.model);
    if let Some(api_base) = &config.analysis.api_base {
        analyzer = analyzer.with_api_base(api_base);
    }
    let analyzer: Arc<dyn ScatAnalyzer> = Arc::new(analyzer);

    // Enrichment service
    let wiki: Arc<dyn WikiService> = Arc::new(RestWikiService::new(Arc::clone(&http_client)));

    // Feature flags
    let flags: Arc<dyn FeatureFlags> = match config.flags.backend {
        FlagsBackend::Flagsmith => {
            let flagsmith = config
                .flags
                .flagsmith
                .as_ref()
                .context("flagsmith backend selected but not configured")?;
            info!("Using Flagsmith feature flags ({})", flagsmith.host);
            Arc::new(
                FlagsmithFlags::new(Arc::clone(&http_client), &flagsmith.environment_key)
                    .with_host(&flagsmith.host),
            )
        }
        FlagsBackend::Fixed => {
            info!("Using fixed feature flags");
            Arc::new(FixedFlags::new(
                config.flags.fixed.clone().unwrap_or_default(),
            ))
        }
    };

    // Scan pipeline
    let events = ScanBroadcaster::new(EVENT_BUFFER_SIZE);
    let orchestrator = Arc::new(ScanOrchestrator::new(
        analyzer,
        wiki,
        flags,
        Arc::clone(&history),
        events.clone(),
    ));

    // Create shared state
    let state = Arc::new(AppState::new(
        config.clone(),
        orchestrator,
        history,
        events,
    ));

    // Create router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(config.server.host, config.server.port);
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    // Run server with graceful shutdown
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
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
