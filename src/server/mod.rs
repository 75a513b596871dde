//! MCP server implementation for IKANISA MoMo tools.
//!
//! This module provides the MCP protocol server that exposes payment-code
//! validation and payment initiation through the Model Context Protocol.

pub mod handlers;

pub use handlers::IkanisaMcpServer;

use anyhow::Result;
use rmcp::transport::io::stdio;
use rmcp::ServiceExt;

/// Run the server with stdio transport until the client disconnects.
pub async fn run_server(server: IkanisaMcpServer) -> Result<()> {
    let service = server.serve(stdio()).await?;
    service.waiting().await?;

    Ok(())
}
