//! IKANISA MoMo Server - Main entry point
//!
//! Exposes the MoMo payment-code tools over the Model Context Protocol (stdio).

use anyhow::Result;
use ikanisa_momo::{Config, IkanisaMcpServer};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Config first so LOG_LEVEL can seed the filter; RUST_LOG still wins
    let config = Config::from_env();
    let level = config
        .as_ref()
        .map(|c| c.log_level.clone())
        .unwrap_or_else(|_| "error".to_string());

    // Initialize logging (stderr only to avoid polluting stdout/MCP communication)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = match config {
        Ok(cfg) => {
            info!("Configuration loaded successfully");
            cfg
        }
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    info!(
        "Starting IKANISA MoMo server with {} gateway and {} suggestions",
        config.gateway, config.suggestion_engine
    );
    info!("Payment ceiling: {} RWF", config.max_payment_amount);

    let server = IkanisaMcpServer::from_config(&config)?;

    info!("Starting MCP server with stdio transport");
    ikanisa_momo::server::run_server(server).await?;

    info!("IKANISA MoMo server shutdown complete");
    Ok(())
}
