//! zdesk - MCP server for the Zendesk API
//!
//! This binary runs as an MCP server using stdio transport, exposing one
//! Zendesk endpoint group to an MCP client.
//!
//! # Configuration
//!
//! Set the following environment variables (or use a `.env` file):
//!
//! - `ZENDESK_SUBDOMAIN`: Account subdomain (`acme` for `acme.zendesk.com`)
//! - `ZENDESK_USERNAME` + `ZENDESK_TOKEN`: API token authentication
//!   (or `ZENDESK_PASSWORD` / `ZENDESK_OAUTH_TOKEN`)
//! - `ZENDESK_ENDPOINT_GROUP`: `core` (default), `helpcenter`, `nps`,
//!   `services` or `voice`
//!
//! # Usage
//!
//! ```bash
//! ZENDESK_SUBDOMAIN=acme ZENDESK_USERNAME=agent@acme.com ZENDESK_TOKEN=xxx ./zdesk
//! ```

use anyhow::{Context, Result};
use rmcp::{transport::stdio, ServiceExt};
use tracing_subscriber::{fmt, EnvFilter};

use zdesk::{client::ZendeskClient, config, server};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (ignore errors if not found)
    dotenvy::dotenv().ok();

    // Initialize logging to stderr (critical for stdio transport!)
    // stdout is reserved for MCP JSON-RPC messages
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("zdesk=info")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    tracing::info!("Starting zdesk MCP server v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration from environment
    let config = config::Config::from_env().context("Failed to load configuration")?;

    // Create the Zendesk client for the configured endpoint group
    let client = ZendeskClient::new(&config).context("Failed to create Zendesk client")?;

    tracing::debug!(
        base_url = client.transport().base_url(),
        group = %client.group(),
        "Zendesk client initialized"
    );

    // Test connection to Zendesk before starting
    tracing::info!("Testing connection to Zendesk...");
    if let Err(e) = client.transport().test_connection().await {
        tracing::error!(error = %e.sanitized_display(&config.secrets()), "Connection test failed");
        // Keep going: the account may become reachable later
        tracing::warn!(
            "Server will start but may not be able to reach Zendesk. \
             Check configuration and network connectivity."
        );
    }

    // Create the MCP server
    let server = server::ZdeskServer::new(client);

    tracing::info!("Server initialized, starting stdio transport");

    // Serve on stdio transport
    let service = server
        .serve(stdio())
        .await
        .inspect_err(|e| {
            tracing::error!("serving error: {:?}", e);
        })
        .context("Failed to start server")?;

    tracing::info!("Server running, waiting for requests");

    // Wait for the service to complete (shutdown signal)
    service
        .waiting()
        .await
        .context("Server error during operation")?;

    tracing::info!("Server shutting down");

    Ok(())
}
