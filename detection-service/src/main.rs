use detection_service::config::DetectionConfig;
use detection_service::startup::Application;
use service_core::config::{environment, load_env};
use service_core::observability::{init_tracing, log_level_for};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    load_env();

    let environment = environment();
    let otlp_endpoint = std::env::var("OTLP_ENDPOINT").ok();
    init_tracing(
        "detection-service",
        log_level_for(&environment),
        otlp_endpoint.as_deref(),
    );

    let config = DetectionConfig::load().map_err(|e| {
        tracing::error!("Failed to load configuration: {}", e);
        std::io::Error::other(format!("Configuration error: {}", e))
    })?;

    let app = Application::build(config).await.map_err(|e| {
        tracing::error!("Failed to build application: {}", e);
        std::io::Error::other(format!("Startup error: {}", e))
    })?;

    tracing::info!(environment = %environment, port = app.port(), "Starting detection service");

    app.run_until_stopped().await?;

    tracing::info!("Detection service stopped");
    Ok(())
}
