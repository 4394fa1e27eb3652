//! Almanac: a weather forecast service.
//!
//! This is the application entry point. It initializes tracing, loads the
//! TOML configuration, opens, migrates and seeds the forecast store, sets up
//! the Axum router and starts the HTTP server.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use almanac::config::{AppConfig, LoggingConfig, DEFAULT_CONFIG_PATH, DEFAULT_LOG_FILTER};
use almanac::http::start_server;
use almanac::initialize;
use almanac::routes::create_router;

/// Almanac: serves weather forecasts from SQLite
#[derive(Parser, Debug)]
#[command(name = "almanac", version, about)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: String,

    /// Log level filter (e.g., "almanac=debug,tower_http=info")
    #[arg(short, long)]
    log_level: Option<String>,

    /// Database URL, overriding `database.url` from the config file
    #[arg(long)]
    database_url: Option<String>,
}

fn init_tracing(filter: &str, logging: &LoggingConfig) {
    let registry = tracing_subscriber::registry().with(EnvFilter::new(filter));

    if logging.is_json() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Load configuration first; it decides the log format
    let mut config = AppConfig::load(&args.config)?;
    if let Some(url) = args.database_url {
        config.database.url = url;
    }

    // Initialize tracing with priority: CLI > env > default
    let log_filter = args
        .log_level
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());
    init_tracing(&log_filter, &config.logging);

    tracing::info!(path = %args.config, "Loaded configuration");

    // Store, schema and seed must all succeed before we accept a connection
    let state = match initialize(config).await {
        Ok(state) => state,
        Err(e) => {
            tracing::error!(error = %e, "Startup failed");
            return Err(e.into());
        }
    };

    let store = state.store.clone();
    let http_config = state.config.http.clone();
    let app = create_router(state);

    let result = start_server(app, &http_config).await;

    store.close().await;
    tracing::info!("Forecast store closed, exiting");

    Ok(result?)
}
