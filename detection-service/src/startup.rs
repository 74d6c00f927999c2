//! Application startup and lifecycle management.

use crate::config::DetectionConfig;
use crate::handlers;
use crate::services::providers::gemini::{GeminiConfig, GeminiVisionProvider};
use crate::services::providers::VisionProvider;
use crate::services::{AssetGenerator, AssetStore, DetectionService};
use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::request_id_middleware;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: DetectionConfig,
    pub detector: DetectionService,
    pub asset_store: Arc<AssetStore>,
    pub asset_generator: AssetGenerator,
}

/// Model backends used by the service.
#[derive(Clone)]
pub struct Providers {
    pub detection: Arc<dyn VisionProvider>,
    pub asset: Arc<dyn VisionProvider>,
}

impl Providers {
    /// Gemini providers for detection and texture generation.
    pub fn gemini(config: &DetectionConfig) -> Result<Self, AppError> {
        let provider = |model: &str| -> Result<Arc<dyn VisionProvider>, AppError> {
            let provider = GeminiVisionProvider::new(GeminiConfig {
                api_key: config.google.api_key.clone(),
                model: model.to_string(),
                base_url: config.google.api_base_url.clone(),
            })
            .map_err(|e| AppError::ConfigError(anyhow::Error::new(e)))?;
            Ok(Arc::new(provider))
        };

        let detection = provider(&config.models.detection_model)?;
        let asset = provider(&config.models.asset_model)?;

        tracing::info!(
            detection_model = %config.models.detection_model,
            asset_model = %config.models.asset_model,
            "Initialized Gemini providers"
        );

        Ok(Self { detection, asset })
    }
}

pub fn router(state: AppState) -> Router {
    let body_limit = state.config.upload.max_upload_bytes;

    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health_check))
        .route("/detect", post(handlers::detect_objects))
        .route("/assets/create", post(handlers::create_asset))
        .route("/asset", get(handlers::get_asset))
        .route("/asset/", get(handlers::get_asset))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(request_id_middleware))
        .with_state(state)
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    state: AppState,
}

impl Application {
    /// Build the application with Gemini providers.
    pub async fn build(config: DetectionConfig) -> Result<Self, AppError> {
        let providers = Providers::gemini(&config)?;
        Self::build_with_providers(config, providers).await
    }

    /// Build the application with the given providers.
    pub async fn build_with_providers(
        config: DetectionConfig,
        providers: Providers,
    ) -> Result<Self, AppError> {
        let asset_store = Arc::new(AssetStore::new(
            &config.assets.origin_dir,
            &config.assets.created_dir,
        ));
        tracing::info!(
            origin_dir = %config.assets.origin_dir,
            created_dir = %config.assets.created_dir,
            "Initialized asset store"
        );

        let state = AppState {
            detector: DetectionService::new(
                providers.detection,
                config.upload.max_image_dimension,
            ),
            asset_generator: AssetGenerator::new(providers.asset, asset_store.clone()),
            asset_store,
            config: config.clone(),
        };

        // Port 0 binds a random port for testing
        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Detection service listening on port {}", port);

        Ok(Self {
            port,
            listener,
            state,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Serve requests until a shutdown signal arrives.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        axum::serve(self.listener, router(self.state))
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
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
                tracing::error!("Failed to install SIGTERM handler: {}", e);
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

    tracing::info!("Shutdown signal received");
}
