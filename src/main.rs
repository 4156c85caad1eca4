use customer_billing::{
    api::{AppState, build_router},
    config::{self, database},
    errors::{Error, Result},
};
use dotenvy::dotenv;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*, reload};

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible). Until the configuration is
    //    loaded the filter is RUST_LOG or "info".
    let (filter, filter_handle) = reload::Layer::new(
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    );
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .init();

    // 2. Load .env file (non-fatal, env vars can be set externally)
    dotenv().ok();
    info!("Attempted to load .env file.");

    // 3. Load the application configuration, then switch the filter to
    //    RUST_LOG (possibly from .env) or the configured log level
    let app_config = config::load_app_configuration()
        .inspect_err(|e| error!("Failed to load configuration: {}", e))?;
    let directive = std::env::var("RUST_LOG").unwrap_or_else(|_| app_config.log_level.clone());
    if let Err(e) = filter_handle.reload(EnvFilter::new(&directive)) {
        warn!("Could not apply log filter '{}': {}", directive, e);
    }
    info!(
        "Starting {} v{}",
        app_config.app_name, app_config.app_version
    );

    // 4. Connect and make sure the schema exists
    let db = database::connect(&app_config)
        .await
        .inspect(|_| info!("Database connection established."))
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    database::create_tables(&db)
        .await
        .inspect_err(|e| error!("Failed to create tables: {}", e))?;

    // 5. Serve until Ctrl-C
    let bind_addr = app_config.bind_addr.clone();
    let app = build_router(AppState::new(db, app_config));
    let listener = TcpListener::bind(&bind_addr)
        .await
        .inspect_err(|e| error!("Failed to bind {}: {}", bind_addr, e))?;
    info!("Listening on {}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(Error::from)?;

    info!("Server stopped.");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
    }
}
