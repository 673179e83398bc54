// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc, time::Duration};
use anyhow::Context;
use axum::{
    routing::{delete, get, put},
    Router,
};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::application::analytics_pipeline::AnalyticsPipeline;
use crate::application::dashboard_session::DashboardSession;
use crate::application::dataset_service::DatasetService;
use crate::infrastructure::config::load_app_config;
use crate::infrastructure::http_dataset_repository::HttpDatasetRepository;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    apply_filter, clear_session, delete_dataset, download_report, get_session, health_check,
    list_datasets, select_dataset, upload_dataset,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let app_config = load_app_config()?;

    // Create repository (infrastructure layer)
    let repository = Arc::new(HttpDatasetRepository::new(
        app_config.backend.base_url.clone(),
        app_config.backend.token.clone(),
        Duration::from_secs(app_config.backend.timeout_secs),
    )?);

    // Create services (application layer)
    let pipeline = AnalyticsPipeline::new(&app_config.analytics);
    let dataset_service = DatasetService::new(repository.clone(), app_config.analytics.history_limit);
    let session = Arc::new(DashboardSession::new(repository, pipeline));

    let state = Arc::new(AppState {
        dataset_service,
        session,
    });

    // Build router (presentation layer)
    // JSON bodies are compressed in the response helpers, so no CompressionLayer here
    let router = Router::new()
        .route("/healthz", get(health_check))
        .route("/datasets", get(list_datasets).post(upload_dataset))
        .route("/datasets/:id", delete(delete_dataset))
        .route("/datasets/:id/report", get(download_report))
        .route("/session", get(get_session).delete(clear_session))
        .route("/session/dataset/:id", put(select_dataset))
        .route("/session/filter", put(apply_filter))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr: SocketAddr = app_config
        .server
        .bind_addr
        .parse()
        .with_context(|| format!("Invalid bind address {}", app_config.server.bind_addr))?;
    tracing::info!("Starting equipment-analytics service on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
