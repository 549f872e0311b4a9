use std::sync::Arc;

use anyhow::{Context, Result};
use rmcp::{
    ServiceExt,
    transport::{
        stdio,
        streamable_http_server::{StreamableHttpService, session::local::LocalSessionManager},
    },
};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

use alttext_ai_mcp::{
    alttext::AltTextClient,
    config::{AppConfig, Transport},
    mcp_server::AltTextServer,
};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_logging();

    let config = AppConfig::from_env()?;
    let client = AltTextClient::new(
        &config.api_key,
        config.base_url.as_deref(),
        config.client_tag.as_deref(),
    )?;
    info!(
        base_url = client.base_url(),
        transport = ?config.transport,
        "starting alttext-ai-mcp v{}",
        env!("CARGO_PKG_VERSION")
    );
    let client = Arc::new(client);

    match config.transport {
        Transport::Stdio => serve_stdio(client).await,
        Transport::Http { bind_address } => serve_http(client, &bind_address).await,
    }
}

// stdout carries the protocol, so logs go to stderr.
fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("alttext_ai_mcp=info"));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false)
        .init();
}

async fn serve_stdio(client: Arc<AltTextClient>) -> Result<()> {
    let service = AltTextServer::new(client)
        .serve(stdio())
        .await
        .context("start stdio transport")?;
    service.waiting().await?;
    info!("stdio session closed");
    Ok(())
}

async fn serve_http(client: Arc<AltTextClient>, bind_address: &str) -> Result<()> {
    let service = StreamableHttpService::new(
        move || Ok(AltTextServer::new(client.clone())),
        LocalSessionManager::default().into(),
        Default::default(),
    );
    let router = axum::Router::new().nest_service("/mcp", service);
    let tcp_listener = tokio::net::TcpListener::bind(bind_address)
        .await
        .with_context(|| format!("bind {bind_address}"))?;

    info!("MCP HTTP server listening at http://{bind_address}/mcp");

    axum::serve(tcp_listener, router)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;
    Ok(())
}
