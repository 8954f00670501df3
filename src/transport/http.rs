//! HTTP transport
//!
//! Serves the authorization router over HTTP until shutdown.

use crate::access_control::UriAuthorizer;
use crate::error::TransportError;
use crate::server::router;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Default port for the HTTP transport
pub const DEFAULT_HTTP_PORT: u16 = 20290;

/// Configuration for the HTTP server
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Address to bind to (e.g., "127.0.0.1:20290")
    pub bind: SocketAddr,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], DEFAULT_HTTP_PORT)),
        }
    }
}

impl HttpConfig {
    /// Create a new HTTP config with the specified bind address
    pub fn new(bind: SocketAddr) -> Self {
        Self { bind }
    }

    /// Create config from host and port strings
    pub fn from_host_port(host: &str, port: u16) -> Result<Self, TransportError> {
        let address = format!("{}:{}", host, port);
        let bind: SocketAddr = address.parse().map_err(|e: std::net::AddrParseError| {
            TransportError::Bind {
                address: address.clone(),
                reason: e.to_string(),
            }
        })?;
        Ok(Self::new(bind))
    }
}

/// Serve the authorizer over HTTP until `ct` is cancelled
///
/// Clients expect a fixed address, so the configured port is bound as-is and
/// an occupied port is an error.
pub async fn run_http(
    authorizer: Arc<UriAuthorizer>,
    config: HttpConfig,
    ct: CancellationToken,
) -> Result<(), TransportError> {
    let listener = TcpListener::bind(config.bind).await?;
    let local = listener.local_addr()?;

    info!("Authorization server listening on http://{}", local);
    info!("  Authorize endpoint: /authorize");
    info!("  Health endpoint: /health");

    axum::serve(listener, router(authorizer))
        .with_graceful_shutdown(async move { ct.cancelled().await })
        .await?;

    info!("HTTP server stopped");
    Ok(())
}

/// Serve the authorizer over HTTP and wait for Ctrl+C
pub async fn run_http_blocking(
    authorizer: Arc<UriAuthorizer>,
    config: HttpConfig,
) -> Result<(), TransportError> {
    let ct = CancellationToken::new();
    let shutdown = ct.clone();

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Received shutdown signal");
        }
        shutdown.cancel();
    });

    info!("Press Ctrl+C to stop the server");
    run_http(authorizer, config, ct).await
}
