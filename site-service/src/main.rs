use service_core::observability::init_tracing;
use site_service::config::SiteConfig;
use site_service::services::init_metrics;
use site_service::startup::Application;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // Must run before anything records a metric
    init_metrics();

    let config = SiteConfig::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        std::io::Error::other(format!("Configuration error: {}", e))
    })?;

    init_tracing(
        "site-service",
        &config.common.log_level,
        config.otlp_endpoint.as_deref(),
    );

    tracing::info!(
        port = config.common.port,
        database_url_set = config.database.url_is_set(),
        database_name_set = config.database.name_is_set(),
        "Starting site-service"
    );

    let app = Application::build(config).await.map_err(|e| {
        tracing::error!("Failed to start application: {}", e);
        std::io::Error::other(format!("Startup error: {}", e))
    })?;

    app.run_until_stopped().await
}
