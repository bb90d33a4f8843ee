//! Deployment dashboard server
//!
//! Serves the deployment list, built from live cluster state, over HTTP
//! together with health and Prometheus endpoints.

use anyhow::{Context, Result};
use dashboard_lib::{
    health::{components, HealthRegistry},
    DashboardMetrics, DeploymentListService, KubeClusterSource, StructuredLogger,
};
use dashboard_server::{api, config::DashboardConfig};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const DASHBOARD_VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing with JSON output and env filter
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().json())
        .init();

    info!("Starting deployment dashboard");

    let config = DashboardConfig::load()?;
    info!(
        instance = %config.instance_name,
        namespaces = %config.namespace,
        "Dashboard configured"
    );

    let health_registry = HealthRegistry::with_failure_threshold(config.unhealthy_after_failures);
    health_registry.register(components::CLUSTER_API).await;
    health_registry.register(components::HTTP_API).await;

    let metrics = DashboardMetrics::new();
    let logger = StructuredLogger::new(&config.instance_name);

    let source = KubeClusterSource::try_default()
        .await
        .context("Failed to create Kubernetes client")?;

    let service = DeploymentListService::new(
        Arc::new(source),
        metrics,
        logger.clone(),
        health_registry.clone(),
    );
    let app_state = Arc::new(api::AppState::new(
        service,
        health_registry.clone(),
        config.namespaces(),
    ));

    health_registry.set_ready(true).await;
    logger.log_startup(DASHBOARD_VERSION, config.api_port);

    let api_handle = tokio::spawn(api::serve(config.api_port, app_state));

    tokio::select! {
        result = api_handle => {
            result.context("API server task failed")??;
        }
        signal = tokio::signal::ctrl_c() => {
            signal?;
            logger.log_shutdown("SIGINT received");
        }
    }

    info!("Shutting down");
    Ok(())
}
