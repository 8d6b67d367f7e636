//! Route definitions for the dashboard server

use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;

/// Creates the main application router with all routes and middleware
pub fn create_router(state: Arc<AppState>) -> Router {
    // Permissive CORS: the page and the API are same-origin in normal use,
    // but this keeps local experiments against the API painless
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // The dashboard page
        .route("/", get(handlers::serve_index))
        // Health check
        .route("/health", get(handlers::health_check))
        // Sidebar filter values
        .route("/api/filters", get(handlers::get_filters))
        // KPI cards
        .route("/api/summary", get(handlers::get_summary))
        // Rankings
        .route("/api/companies/top", get(handlers::get_top_companies))
        .route("/api/countries/top", get(handlers::get_top_countries))
        .route("/api/markets/top", get(handlers::get_top_markets))
        .route("/api/markets/distribution", get(handlers::get_market_distribution))
        .route("/api/markets/emerging", get(handlers::get_emerging_markets))
        .route("/api/markets/wordcloud", get(handlers::get_market_wordcloud))
        // Trends
        .route("/api/trend", get(handlers::get_funding_trend))
        .route("/api/markets/:market/trend", get(handlers::get_market_trend))
        // Status breakdown
        .route("/api/status", get(handlers::get_status_breakdown))
        // Add middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        // Add shared state
        .with_state(state)
}
