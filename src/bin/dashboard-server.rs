//! Funding Dashboard Server Binary
//!
//! Run with: `cargo run --bin dashboard-server`

use funding_dashboard::{run_server, ServerConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Note: Tracing is initialized in run_server()
    // Set RUST_LOG environment variable to control log level:
    //   RUST_LOG=debug cargo run --bin dashboard-server

    // Create configuration from environment variables or defaults
    let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port = std::env::var("PORT")
        .unwrap_or_else(|_| "3000".to_string())
        .parse::<u16>()
        .unwrap_or(3000);
    let data_path =
        std::env::var("DATA_PATH").unwrap_or_else(|_| "investments_VC.csv".to_string());

    let config = ServerConfig::new(host, port, data_path);

    println!("Starting Funding Dashboard...");
    println!("   Host: {}", config.host);
    println!("   Port: {}", config.port);
    println!("   Data: {}", config.data_path);
    println!();
    println!(
        "Dashboard will be available at: http://{}:{}",
        config.host, config.port
    );
    println!();
    println!("Available endpoints:");
    println!("  GET  /                          - Dashboard page");
    println!("  GET  /health                    - Health check");
    println!("  GET  /api/filters               - Sidebar filter values");
    println!("  GET  /api/summary               - KPI summary");
    println!("  GET  /api/companies/top         - Top funded companies");
    println!("  GET  /api/countries/top         - Top countries by funding");
    println!("  GET  /api/markets/top           - Top markets by funding");
    println!("  GET  /api/markets/distribution  - Market share of records");
    println!("  GET  /api/markets/emerging      - Emerging markets");
    println!("  GET  /api/markets/wordcloud     - Market word frequencies");
    println!("  GET  /api/markets/:market/trend - Per-market funding trend");
    println!("  GET  /api/trend                 - Yearly funding trend");
    println!("  GET  /api/status                - Status breakdown");
    println!();

    // Run server
    run_server(config).await?;

    Ok(())
}
