//! HTTP server for the funding dashboard
//!
//! Serves the single dashboard page at `/` and the JSON aggregate endpoints
//! under `/api`. The dataset is loaded once when the server starts; every
//! request after that is a stateless filter-and-aggregate pass.

mod error;
mod handlers;
mod routes;
mod state;

pub use error::ApiError;
pub use handlers::DashboardQuery;
pub use state::AppState;

use crate::dataset::FundingDataset;
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Server host address (default: "127.0.0.1")
    pub host: String,
    /// Server port (default: 3000)
    pub port: u16,
    /// Path to the funding CSV
    pub data_path: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 3000,
            data_path: "investments_VC.csv".to_string(),
        }
    }
}

impl ServerConfig {
    /// Creates a new server configuration
    pub fn new(host: impl Into<String>, port: u16, data_path: impl Into<String>) -> Self {
        ServerConfig {
            host: host.into(),
            port,
            data_path: data_path.into(),
        }
    }
}

/// Runs the dashboard server
///
/// Loads the dataset from `config.data_path`, then serves until the process
/// is stopped.
///
/// # Errors
/// Returns an error if the CSV cannot be loaded or the listener fails to
/// bind.
/// Builds the log filter from `RUST_LOG`-style directives, defaulting to
/// `info` when none are set.
fn log_filter(directives: Option<&str>) -> EnvFilter {
    match directives {
        Some(value) => EnvFilter::new(value),
        None => EnvFilter::new("info"),
    }
}

pub async fn run_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing; RUST_LOG controls the level
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(std::env::var("RUST_LOG").ok().as_deref()))
        .with_target(false)
        .compact()
        .init();

    // Load the dataset once; everything downstream borrows it
    let dataset = FundingDataset::load(Path::new(&config.data_path))?;

    // Create application state
    let state = Arc::new(AppState::new(dataset));

    // Create router
    let app = routes::create_router(state);

    // Build server address
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Dashboard listening on http://{}", addr);

    // Run server
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_filter_defaults_to_info() {
        assert_eq!(log_filter(None).to_string(), "info");
    }

    #[test]
    fn test_log_filter_honors_rust_log_directives() {
        assert_eq!(log_filter(Some("debug")).to_string(), "debug");
        assert_eq!(
            log_filter(Some("funding_dashboard=debug")).to_string(),
            "funding_dashboard=debug"
        );
    }
}
