//! Main entry point for the SnapCloset styling backend

use snapcloset_backend::{
    api,
    backend::HttpGenerationClient,
    call_log::JsonlCallLogger,
    config::Settings,
    AppState,
};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Load configuration
    let settings = Settings::load()?;
    settings.validate()?;

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.logging.level));

    let registry = tracing_subscriber::registry().with(filter);
    if settings.logging.format == "json" {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }

    info!("Starting SnapCloset styling backend");
    info!(
        "Loaded configuration: server={}:{} model={}",
        settings.server.host, settings.server.port, settings.openai.model
    );
    if settings.openai.api_key.is_empty() {
        warn!("No API key configured; generation calls will be rejected");
    }

    let client = Arc::new(HttpGenerationClient::new(&settings.openai)?);
    let call_log = Arc::new(JsonlCallLogger::new(&settings.logging.call_log_file));

    let addr = format!("{}:{}", settings.server.host, settings.server.port);

    // Create application state
    let app_state = Arc::new(AppState::new(settings, client, call_log));

    // Build the router
    let app = api::routes::create_router(app_state);

    info!("Server listening on {}", addr);

    // Start the server
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
