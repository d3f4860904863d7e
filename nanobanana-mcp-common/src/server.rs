//! MCP server builder.
//!
//! Runs any `rmcp::ServerHandler` over the configured [`Transport`] until the
//! client disconnects, a termination signal arrives, or the optional shutdown
//! channel fires.
//!
//! # Example
//!
//! ```ignore
//! use nanobanana_mcp_common::server::McpServerBuilder;
//! use nanobanana_mcp_common::transport::Transport;
//!
//! McpServerBuilder::new(handler)
//!     .with_transport(Transport::stdio())
//!     .run()
//!     .await?;
//! ```

use crate::transport::Transport;
use rmcp::{ServerHandler, ServiceExt};
use thiserror::Error;
use tokio::sync::oneshot;
use tracing::{info, warn};

/// Path the streamable HTTP service is mounted at.
pub const MCP_HTTP_PATH: &str = "/mcp";

/// Errors that can occur when running an MCP server.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Failed to bind to the specified port
    #[error("Failed to bind to port {port}: {message}")]
    BindFailed { port: u16, message: String },

    /// Transport error during communication
    #[error("Transport error: {0}")]
    Transport(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Builder for configuring and running MCP servers.
pub struct McpServerBuilder<H> {
    handler: H,
    transport: Transport,
    shutdown_rx: Option<oneshot::Receiver<()>>,
}

impl<H> McpServerBuilder<H>
where
    H: ServerHandler + Clone + Send + Sync + 'static,
{
    /// Create a new server builder with the given handler.
    pub fn new(handler: H) -> Self {
        Self {
            handler,
            transport: Transport::default(),
            shutdown_rx: None,
        }
    }

    /// Set the transport mode for the server.
    pub fn with_transport(mut self, transport: Transport) -> Self {
        self.transport = transport;
        self
    }

    /// Stop the server when `shutdown_rx` fires or its sender is dropped,
    /// instead of waiting for SIGINT/SIGTERM.
    pub fn with_shutdown(mut self, shutdown_rx: oneshot::Receiver<()>) -> Self {
        self.shutdown_rx = Some(shutdown_rx);
        self
    }

    /// Run the MCP server until shutdown.
    pub async fn run(self) -> Result<(), ServerError> {
        info!(transport = %self.transport, "Starting MCP server");

        match self.transport {
            Transport::Stdio => self.run_stdio().await,
            Transport::Http { port } => self.run_http(port).await,
        }
    }

    async fn run_stdio(self) -> Result<(), ServerError> {
        use rmcp::transport::io::stdio;

        let shutdown = shutdown_future(self.shutdown_rx);

        let service = self
            .handler
            .serve(stdio())
            .await
            .map_err(|e| ServerError::Transport(e.to_string()))?;

        tokio::select! {
            result = service.waiting() => {
                result.map_err(|e| ServerError::Transport(e.to_string()))?;
                info!("Client disconnected");
                Ok(())
            }
            _ = shutdown => {
                info!("Received shutdown signal, stopping server");
                Ok(())
            }
        }
    }

    async fn run_http(self, port: u16) -> Result<(), ServerError> {
        use rmcp::transport::streamable_http_server::{
            StreamableHttpService, session::local::LocalSessionManager,
        };

        let handler = self.handler.clone();
        let service = StreamableHttpService::new(
            move || Ok(handler.clone()),
            LocalSessionManager::default().into(),
            Default::default(),
        );

        let router = axum::Router::new().nest_service(MCP_HTTP_PATH, service);

        let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
            .await
            .map_err(|e| ServerError::BindFailed {
                port,
                message: e.to_string(),
            })?;

        let local_addr = listener.local_addr()?;
        info!(%local_addr, path = MCP_HTTP_PATH, "HTTP server listening");

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_future(self.shutdown_rx))
            .await
            .map_err(|e| ServerError::Transport(e.to_string()))?;

        info!("HTTP server stopped");
        Ok(())
    }
}

async fn shutdown_future(shutdown_rx: Option<oneshot::Receiver<()>>) {
    match shutdown_rx {
        Some(rx) => {
            let _ = rx.await;
        }
        None => wait_for_shutdown_signal().await,
    }
}

/// Wait for SIGTERM or SIGINT (Ctrl+C elsewhere).
async fn wait_for_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = sigterm.recv() => info!("Received SIGTERM"),
                    _ = tokio::signal::ctrl_c() => info!("Received SIGINT"),
                }
            }
            Err(e) => {
                warn!(error = %e, "Failed to register SIGTERM handler, waiting for Ctrl+C only");
                if tokio::signal::ctrl_c().await.is_ok() {
                    info!("Received SIGINT");
                }
            }
        }
    }

    #[cfg(not(unix))]
    {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Received Ctrl+C");
        }
    }
}

/// Create a programmatic shutdown channel for [`McpServerBuilder::with_shutdown`].
pub fn shutdown_channel() -> (oneshot::Sender<()>, oneshot::Receiver<()>) {
    oneshot::channel()
}
